//! Late-submission exception workflow.
//!
//! A student who needs documents accepted after a period's normal window
//! files a request. An administrator decides it exactly once:
//!
//! - Pending → Approved (approve, with `open_until`)
//! - Pending → Denied (deny)
//!
//! Both outcomes are terminal. An approval extends the document window for
//! that student and period up to `open_until`.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LateSubmissionError;
pub use service::LateSubmissionService;
pub use types::{
    CreateLateSubmissionInput, DecisionAction, LateSubmissionDecision, LateSubmissionRequest,
};
