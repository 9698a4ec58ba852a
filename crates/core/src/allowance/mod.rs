//! Allowance generation and claim lifecycle.
//!
//! Generation aggregates a student's eligible documents for one monthly
//! period with the admin-entered baseline, caps the book component and
//! produces exactly one allowance per (student, period). Claiming is a
//! one-way transition guarded by a confirmation phrase.

pub mod calculator;
pub mod claim;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use calculator::{AllowanceCalculator, BOOK_ALLOWANCE_CAP};
pub use claim::{CONFIRMATION_PHRASE, ClaimService};
pub use error::AllowanceError;
pub use service::AllowanceService;
pub use types::{
    Allowance, AllowanceBreakdown, AllowancePeriod, AllowancePreview, Baseline,
    GenerateAllowanceInput, MAX_YEAR_LEVEL, MIN_YEAR_LEVEL,
};
