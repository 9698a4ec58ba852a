//! Core business logic for Stipend.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `period` - Monthly and semestral periods, the generation gate, the calendar
//! - `document` - Supporting documents and the per-period document window
//! - `late_submission` - Late-submission exception requests and their decisions
//! - `allowance` - Allowance aggregation, capping and the claim guard
//! - `events` - Domain events for the notification collaborator
//! - `money` - Monetary input validation

pub mod allowance;
pub mod document;
pub mod events;
pub mod late_submission;
pub mod money;
pub mod period;
