//! Domain events published after successful mutations.
//!
//! Consumers (notification delivery, audit) subscribe to the bus; this crate
//! does not deliver anything itself.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stipend_shared::types::{AllowanceId, LateSubmissionId, StudentId, UserId};
use tokio::sync::broadcast;

use crate::period::MonthPeriod;

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// A state change in the allowance core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AllowanceEvent {
    /// An allowance was generated.
    AllowanceGenerated {
        /// The allowance.
        allowance_id: AllowanceId,
        /// Its student.
        student_id: StudentId,
        /// Its period.
        period: MonthPeriod,
        /// Total amount.
        total: Decimal,
    },
    /// An allowance was claimed.
    AllowanceClaimed {
        /// The allowance.
        allowance_id: AllowanceId,
        /// Its student.
        student_id: StudentId,
        /// When it was claimed.
        claimed_at: DateTime<Utc>,
    },
    /// A late-submission request was approved.
    LateSubmissionApproved {
        /// The request.
        request_id: LateSubmissionId,
        /// The requesting student.
        student_id: StudentId,
        /// Its period.
        period: MonthPeriod,
        /// End of the extended window.
        open_until: DateTime<Utc>,
        /// The deciding administrator.
        decided_by: UserId,
    },
    /// A late-submission request was denied.
    LateSubmissionDenied {
        /// The request.
        request_id: LateSubmissionId,
        /// The requesting student.
        student_id: StudentId,
        /// Its period.
        period: MonthPeriod,
        /// The deciding administrator.
        decided_by: UserId,
    },
}

impl AllowanceEvent {
    /// Short name of the event kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AllowanceGenerated { .. } => "allowance_generated",
            Self::AllowanceClaimed { .. } => "allowance_claimed",
            Self::LateSubmissionApproved { .. } => "late_submission_approved",
            Self::LateSubmissionDenied { .. } => "late_submission_denied",
        }
    }

    /// The student the event concerns.
    #[must_use]
    pub const fn student_id(&self) -> StudentId {
        match self {
            Self::AllowanceGenerated { student_id, .. }
            | Self::AllowanceClaimed { student_id, .. }
            | Self::LateSubmissionApproved { student_id, .. }
            | Self::LateSubmissionDenied { student_id, .. } => *student_id,
        }
    }
}

/// Broadcast bus for [`AllowanceEvent`]s. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AllowanceEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per slow subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn publish(&self, event: AllowanceEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AllowanceEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
