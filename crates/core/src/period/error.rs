//! Period error types.

use thiserror::Error;

/// Errors raised while building periods from caller input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month outside 1..=12.
    #[error("Invalid month {0}: expected 1-12")]
    InvalidMonth(u32),

    /// Year outside the supported range.
    #[error("Year {0} is outside the supported range")]
    YearOutOfRange(i32),

    /// School year not in `YYYY-YYYY` form with consecutive years.
    #[error("Invalid school year '{0}': expected YYYY-YYYY with consecutive years")]
    InvalidSchoolYear(String),

    /// Unrecognised semester name.
    #[error("Unknown semester '{0}'")]
    UnknownSemester(String),

    /// Unrecognised IANA time zone name.
    #[error("Unknown time zone '{0}'")]
    UnknownTimezone(String),
}
