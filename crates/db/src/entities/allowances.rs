//! `SeaORM` Entity for allowances table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::Semester;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "allowances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub period_month: i32,
    pub period_year: i32,
    pub semester: Semester,
    pub year_level: i32,
    pub monthly_centavos: i64,
    pub book_centavos: i64,
    pub misc_centavos: i64,
    pub thesis_centavos: i64,
    pub total_centavos: i64,
    pub claimed: bool,
    pub claimed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
