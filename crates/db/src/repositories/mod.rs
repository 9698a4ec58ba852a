//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod allowance;
pub mod document;
pub mod late_submission;

pub use allowance::AllowanceRepository;
pub use document::DocumentRepository;
pub use late_submission::LateSubmissionRepository;

use chrono::{DateTime, SubsecRound, Utc};

/// Truncates `at` to the microsecond precision `TIMESTAMPTZ` keeps, so values
/// returned and published match what a later read returns.
pub(crate) fn stored_instant(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}
