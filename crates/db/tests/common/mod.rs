//! Shared fixtures for repository tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use stipend_core::allowance::{Baseline, GenerateAllowanceInput};
use stipend_core::document::{DocumentCategory, RecordDocumentInput};
use stipend_core::period::{DocumentPeriod, MonthPeriod, Semester};
use stipend_db::migration::Migrator;
use stipend_shared::types::StudentId;

/// Fresh in-memory database with the full schema.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn march() -> MonthPeriod {
    MonthPeriod::new(3, 2026).unwrap()
}

/// A moment when March 2026 is the generable period (10 April 2026, Manila).
pub fn april_tenth() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 10, 2, 0, 0).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn generate_input(
    student_id: StudentId,
    period: MonthPeriod,
    baseline: Baseline,
) -> GenerateAllowanceInput {
    GenerateAllowanceInput {
        student_id,
        month: period.month(),
        year: period.year(),
        semester: Semester::Second,
        year_level: 2,
        baseline,
    }
}

pub fn monthly_document(
    student_id: StudentId,
    category: DocumentCategory,
    amount: Decimal,
    period: MonthPeriod,
) -> RecordDocumentInput {
    RecordDocumentInput {
        student_id,
        category,
        claimed_amount: Some(amount),
        period: DocumentPeriod::Monthly(period),
    }
}
