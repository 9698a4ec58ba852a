//! Late-submission decisions.
//!
//! Validates transitions only; persistence applies the returned action with
//! a conditional update guarded on the pending state.

use chrono::{DateTime, Utc};
use stipend_shared::types::UserId;

use super::error::LateSubmissionError;
use super::types::{
    CreateLateSubmissionInput, DecisionAction, LateSubmissionDecision, LateSubmissionRequest,
};
use crate::period::PeriodCalendar;

/// Stateless service for the late-submission state machine.
pub struct LateSubmissionService;

impl LateSubmissionService {
    /// Validates a new request.
    ///
    /// # Errors
    ///
    /// Returns `ReasonRequired` if the reason is blank.
    pub fn validate_new(input: &CreateLateSubmissionInput) -> Result<(), LateSubmissionError> {
        if input.reason.trim().is_empty() {
            return Err(LateSubmissionError::ReasonRequired);
        }
        Ok(())
    }

    /// Approve a pending request, extending its window to `open_until`.
    ///
    /// # Errors
    ///
    /// * `AlreadyDecided` if the request is not pending
    /// * `InvalidOpenUntil` if `open_until` is not after the period start
    pub fn approve(
        request: &LateSubmissionRequest,
        calendar: &PeriodCalendar,
        open_until: DateTime<Utc>,
        decided_by: UserId,
        decided_at: DateTime<Utc>,
    ) -> Result<DecisionAction, LateSubmissionError> {
        Self::ensure_pending(request)?;
        if open_until <= calendar.period_start(request.period) {
            return Err(LateSubmissionError::InvalidOpenUntil {
                period: request.period,
            });
        }
        Ok(DecisionAction::Approve {
            decided_by,
            decided_at,
            open_until,
        })
    }

    /// Deny a pending request.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDecided` if the request is not pending.
    pub fn deny(
        request: &LateSubmissionRequest,
        decided_by: UserId,
        decided_at: DateTime<Utc>,
    ) -> Result<DecisionAction, LateSubmissionError> {
        Self::ensure_pending(request)?;
        Ok(DecisionAction::Deny {
            decided_by,
            decided_at,
        })
    }

    fn ensure_pending(request: &LateSubmissionRequest) -> Result<(), LateSubmissionError> {
        match request.decision {
            LateSubmissionDecision::Pending => Ok(()),
            decision => Err(LateSubmissionError::AlreadyDecided {
                id: request.id.into_inner(),
                decision,
            }),
        }
    }
}
