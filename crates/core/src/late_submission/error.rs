//! Late-submission error types.

use thiserror::Error;
use uuid::Uuid;

use super::types::LateSubmissionDecision;
use crate::period::MonthPeriod;

/// Errors raised by the late-submission workflow.
#[derive(Debug, Error)]
pub enum LateSubmissionError {
    /// Request does not exist.
    #[error("Late-submission request {0} not found")]
    NotFound(Uuid),

    /// Request has already been decided.
    #[error("Late-submission request {id} is already {decision}")]
    AlreadyDecided {
        /// The request.
        id: Uuid,
        /// Its current, terminal decision.
        decision: LateSubmissionDecision,
    },

    /// Blank justification.
    #[error("A reason is required for a late-submission request")]
    ReasonRequired,

    /// `open_until` does not fall after the start of the request's period.
    #[error("open_until must be after the start of period {period}")]
    InvalidOpenUntil {
        /// The request's period.
        period: MonthPeriod,
    },

    /// The student already has a pending request for this period.
    #[error("Student {student_id} already has a pending request for {period}")]
    PendingRequestExists {
        /// The student.
        student_id: Uuid,
        /// The period.
        period: MonthPeriod,
    },

    /// Malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LateSubmissionError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ReasonRequired | Self::InvalidOpenUntil { .. } | Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::AlreadyDecided { .. } | Self::PendingRequestExists { .. } => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "LATE_SUBMISSION_NOT_FOUND",
            Self::AlreadyDecided { .. } => "ALREADY_DECIDED",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::InvalidOpenUntil { .. } => "INVALID_OPEN_UNTIL",
            Self::PendingRequestExists { .. } => "PENDING_REQUEST_EXISTS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_decided_error() {
        let err = LateSubmissionError::AlreadyDecided {
            id: Uuid::nil(),
            decision: LateSubmissionDecision::Denied,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "ALREADY_DECIDED");
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_not_found_error() {
        let err = LateSubmissionError::NotFound(Uuid::nil());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "LATE_SUBMISSION_NOT_FOUND");
    }

    #[test]
    fn test_input_errors_are_bad_request() {
        let period = MonthPeriod::new(3, 2026).unwrap();
        assert_eq!(LateSubmissionError::ReasonRequired.status_code(), 400);
        assert_eq!(
            LateSubmissionError::InvalidOpenUntil { period }.status_code(),
            400
        );
    }

    #[test]
    fn test_pending_request_exists_error() {
        let err = LateSubmissionError::PendingRequestExists {
            student_id: Uuid::nil(),
            period: MonthPeriod::new(3, 2026).unwrap(),
        };
        assert_eq!(err.status_code(), 409);
        assert!(err.to_string().contains("2026-03"));
    }
}
