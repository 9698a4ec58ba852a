//! Late-submission domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use stipend_shared::types::{LateSubmissionId, StudentId, UserId};

use crate::period::MonthPeriod;

/// Decision state of a late-submission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateSubmissionDecision {
    /// Awaiting an administrator.
    Pending,
    /// Approved; the document window is extended.
    Approved,
    /// Denied.
    Denied,
}

impl LateSubmissionDecision {
    /// Returns the string representation of the decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    /// Parses a decision from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "denied" => Some(Self::Denied),
            _ => None,
        }
    }

    /// Returns true once the request has been decided.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for LateSubmissionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A per-student, per-period exception request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateSubmissionRequest {
    /// Unique identifier.
    pub id: LateSubmissionId,
    /// Requesting student.
    pub student_id: StudentId,
    /// Period whose window should be extended.
    pub period: MonthPeriod,
    /// Free-text justification.
    pub reason: String,
    /// Current decision.
    pub decision: LateSubmissionDecision,
    /// Administrator who decided; set only on decision.
    pub decided_by: Option<UserId>,
    /// End of the extended window; set only when approved.
    pub open_until: Option<DateTime<Utc>>,
    /// When the decision was made.
    pub decided_at: Option<DateTime<Utc>>,
    /// When the request was filed.
    pub created_at: DateTime<Utc>,
}

impl LateSubmissionRequest {
    /// The instant this request extends the document window to, if it
    /// is approved.
    #[must_use]
    pub fn extends_window_until(&self) -> Option<DateTime<Utc>> {
        match self.decision {
            LateSubmissionDecision::Approved => self.open_until,
            LateSubmissionDecision::Pending | LateSubmissionDecision::Denied => None,
        }
    }
}

/// Input for filing a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLateSubmissionInput {
    /// Requesting student.
    pub student_id: StudentId,
    /// Period whose window should be extended.
    pub period: MonthPeriod,
    /// Free-text justification.
    pub reason: String,
}

/// A validated decision, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionAction {
    /// Approve a pending request.
    Approve {
        /// The administrator approving.
        decided_by: UserId,
        /// When the decision was made.
        decided_at: DateTime<Utc>,
        /// End of the extended window.
        open_until: DateTime<Utc>,
    },
    /// Deny a pending request.
    Deny {
        /// The administrator denying.
        decided_by: UserId,
        /// When the decision was made.
        decided_at: DateTime<Utc>,
    },
}

impl DecisionAction {
    /// Returns the decision resulting from this action.
    #[must_use]
    pub const fn new_decision(&self) -> LateSubmissionDecision {
        match self {
            Self::Approve { .. } => LateSubmissionDecision::Approved,
            Self::Deny { .. } => LateSubmissionDecision::Denied,
        }
    }

    /// The deciding administrator.
    #[must_use]
    pub const fn decided_by(&self) -> UserId {
        match self {
            Self::Approve { decided_by, .. } | Self::Deny { decided_by, .. } => *decided_by,
        }
    }

    /// When the decision was made.
    #[must_use]
    pub const fn decided_at(&self) -> DateTime<Utc> {
        match self {
            Self::Approve { decided_at, .. } | Self::Deny { decided_at, .. } => *decided_at,
        }
    }

    /// The extended window end, for approvals.
    #[must_use]
    pub const fn open_until(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Approve { open_until, .. } => Some(*open_until),
            Self::Deny { .. } => None,
        }
    }

    /// Applies the action to a request, producing the decided record.
    #[must_use]
    pub fn apply(&self, request: LateSubmissionRequest) -> LateSubmissionRequest {
        LateSubmissionRequest {
            decision: self.new_decision(),
            decided_by: Some(self.decided_by()),
            decided_at: Some(self.decided_at()),
            open_until: self.open_until(),
            ..request
        }
    }
}
