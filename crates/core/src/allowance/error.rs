//! Allowance error types.

use thiserror::Error;
use uuid::Uuid;

use crate::period::MonthPeriod;

/// Errors raised by allowance generation and claiming.
#[derive(Debug, Error)]
pub enum AllowanceError {
    /// Malformed or missing input, rejected before any persistence.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested period is not the one currently eligible.
    #[error("Period {requested} is not generable; the eligible period is {eligible}")]
    NotGenerableYet {
        /// Period the caller asked for.
        requested: MonthPeriod,
        /// The single period generable now.
        eligible: MonthPeriod,
    },

    /// An allowance already exists for this student and period.
    #[error("Allowance for student {student_id} in {period} has already been generated")]
    AlreadyGenerated {
        /// The student.
        student_id: Uuid,
        /// The period.
        period: MonthPeriod,
    },

    /// The allowance has already been claimed.
    #[error("Allowance {0} has already been claimed")]
    AlreadyClaimed(Uuid),

    /// The confirmation phrase did not match.
    #[error("Confirmation phrase does not match")]
    ConfirmationMismatch,

    /// Allowance does not exist.
    #[error("Allowance {0} not found")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AllowanceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::ConfirmationMismatch => 400,
            Self::NotFound(_) => 404,
            Self::AlreadyGenerated { .. } | Self::AlreadyClaimed(_) => 409,
            Self::NotGenerableYet { .. } => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotGenerableYet { .. } => "NOT_GENERABLE_YET",
            Self::AlreadyGenerated { .. } => "ALREADY_GENERATED",
            Self::AlreadyClaimed(_) => "ALREADY_CLAIMED",
            Self::ConfirmationMismatch => "CONFIRMATION_MISMATCH",
            Self::NotFound(_) => "ALLOWANCE_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
