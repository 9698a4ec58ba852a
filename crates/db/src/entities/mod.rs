//! `SeaORM` entity definitions.

pub mod allowances;
pub mod documents;
pub mod late_submission_requests;
pub mod sea_orm_active_enums;
