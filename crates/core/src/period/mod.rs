//! Allowance and document periods.
//!
//! A monthly period is the unit allowances are generated for; semestral
//! periods only scope documents. The generation gate and the document
//! cutoff are both calendar rules evaluated in a configured time zone.

pub mod calendar;
pub mod error;
pub mod gate;
pub mod types;

#[cfg(test)]
mod gate_props;

pub use calendar::PeriodCalendar;
pub use error::PeriodError;
pub use gate::{generable_period, is_generable};
pub use types::{DocumentPeriod, MAX_YEAR, MIN_YEAR, MonthPeriod, Semester, SemesterPeriod};
