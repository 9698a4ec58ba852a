//! Allowance domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stipend_shared::types::{AllowanceId, DocumentId, StudentId};

use super::error::AllowanceError;
use crate::money::check_amount;
use crate::period::{MonthPeriod, Semester};

/// Lowest accepted year level.
pub const MIN_YEAR_LEVEL: u8 = 1;
/// Highest accepted year level.
pub const MAX_YEAR_LEVEL: u8 = 6;

/// Admin-entered amounts per component, before document-derived additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    /// Baseline monthly stipend.
    pub monthly: Decimal,
    /// Baseline book allowance.
    #[serde(default)]
    pub book: Option<Decimal>,
    /// Baseline miscellaneous allowance.
    #[serde(default)]
    pub misc: Option<Decimal>,
    /// Thesis allowance.
    #[serde(default)]
    pub thesis: Option<Decimal>,
}

impl Baseline {
    /// A baseline with only the monthly stipend set.
    #[must_use]
    pub const fn monthly(monthly: Decimal) -> Self {
        Self {
            monthly,
            book: None,
            misc: None,
            thesis: None,
        }
    }

    /// Validates every component.
    ///
    /// # Errors
    ///
    /// Returns `AllowanceError::Validation` for negative, over-precise or
    /// unstorably large amounts.
    pub fn validate(&self) -> Result<(), AllowanceError> {
        check_amount("baseline.monthly", self.monthly).map_err(AllowanceError::Validation)?;
        for (field, amount) in [
            ("baseline.book", self.book),
            ("baseline.misc", self.misc),
            ("baseline.thesis", self.thesis),
        ] {
            if let Some(amount) = amount {
                check_amount(field, amount).map_err(AllowanceError::Validation)?;
            }
        }
        Ok(())
    }
}

/// Period an allowance is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowancePeriod {
    /// Month and year.
    #[serde(flatten)]
    pub period: MonthPeriod,
    /// Semester the month falls in.
    pub semester: Semester,
    /// Student's year level.
    pub year_level: u8,
}

/// Input for generating (or previewing) an allowance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAllowanceInput {
    /// The student.
    pub student_id: StudentId,
    /// Month, 1..=12.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Semester.
    pub semester: Semester,
    /// Year level, 1..=6.
    pub year_level: u8,
    /// Admin-entered baseline.
    pub baseline: Baseline,
}

impl GenerateAllowanceInput {
    /// Validates the input and resolves its period.
    ///
    /// # Errors
    ///
    /// Returns `AllowanceError::Validation` on an invalid month, year,
    /// year level or baseline amount.
    pub fn validate(&self) -> Result<AllowancePeriod, AllowanceError> {
        let period = MonthPeriod::new(self.month, self.year)
            .map_err(|e| AllowanceError::Validation(e.to_string()))?;
        if !(MIN_YEAR_LEVEL..=MAX_YEAR_LEVEL).contains(&self.year_level) {
            return Err(AllowanceError::Validation(format!(
                "year_level must be between {MIN_YEAR_LEVEL} and {MAX_YEAR_LEVEL}"
            )));
        }
        self.baseline.validate()?;
        Ok(AllowancePeriod {
            period,
            semester: self.semester,
            year_level: self.year_level,
        })
    }
}

/// Server-computed components of an allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceBreakdown {
    /// Baseline monthly stipend.
    pub monthly: Decimal,
    /// Sum of eligible BOOK_ALLOWANCE documents.
    pub book_from_documents: Decimal,
    /// Sum of eligible MISCELLANEOUS_ALLOWANCE documents.
    pub misc_from_documents: Decimal,
    /// Baseline book plus document sum, before the ceiling.
    pub raw_book: Decimal,
    /// Effective book allowance.
    pub book: Decimal,
    /// Effective miscellaneous allowance.
    pub misc: Decimal,
    /// Thesis allowance.
    pub thesis: Decimal,
    /// Sum of the four effective components.
    pub total: Decimal,
    /// Whether the book ceiling reduced the book component.
    pub book_capped: bool,
    /// Documents that counted.
    pub counted_documents: Vec<DocumentId>,
    /// Documents stamped with the period that fell outside its window.
    pub excluded_documents: Vec<DocumentId>,
}

/// Result of a preview: what `generate` would persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowancePreview {
    /// The student.
    pub student_id: StudentId,
    /// Target period.
    pub period: AllowancePeriod,
    /// Computed components.
    pub breakdown: AllowanceBreakdown,
    /// Whether the period may be generated right now.
    pub generable: bool,
    /// The period currently open for generation.
    pub eligible_period: MonthPeriod,
}

/// A persisted allowance: one per (student, period).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Unique identifier.
    pub id: AllowanceId,
    /// The student.
    pub student_id: StudentId,
    /// Period, semester and year level.
    pub period: AllowancePeriod,
    /// Baseline monthly stipend.
    pub monthly: Decimal,
    /// Effective book allowance.
    pub book: Decimal,
    /// Effective miscellaneous allowance.
    pub misc: Decimal,
    /// Thesis allowance.
    pub thesis: Decimal,
    /// Total amount.
    pub total: Decimal,
    /// Whether the allowance has been claimed.
    pub claimed: bool,
    /// When it was claimed.
    pub claimed_at: Option<DateTime<Utc>>,
    /// When it was generated.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> GenerateAllowanceInput {
        GenerateAllowanceInput {
            student_id: StudentId::new(),
            month: 3,
            year: 2026,
            semester: Semester::Second,
            year_level: 2,
            baseline: Baseline {
                monthly: dec!(5000.00),
                book: Some(dec!(900)),
                misc: None,
                thesis: None,
            },
        }
    }

    #[test]
    fn test_valid_input_resolves_period() {
        let period = input().validate().unwrap();
        assert_eq!(period.period, MonthPeriod::new(3, 2026).unwrap());
        assert_eq!(period.semester, Semester::Second);
        assert_eq!(period.year_level, 2);
    }

    #[test]
    fn test_invalid_month_rejected() {
        let mut bad = input();
        bad.month = 13;
        assert!(matches!(bad.validate(), Err(AllowanceError::Validation(_))));
    }

    #[test]
    fn test_year_level_range() {
        let mut bad = input();
        bad.year_level = 0;
        assert!(bad.validate().is_err());
        bad.year_level = 7;
        assert!(bad.validate().is_err());
        bad.year_level = 6;
        assert!(bad.validate().is_ok());
    }

    #[test]
    fn test_negative_baseline_rejected() {
        let mut bad = input();
        bad.baseline.thesis = Some(dec!(-1));
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().contains("baseline.thesis"));
    }

    #[test]
    fn test_oversized_baseline_rejected() {
        let mut bad = input();
        bad.baseline.monthly = Decimal::MAX;
        bad.baseline.misc = Some(Decimal::MAX);
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, AllowanceError::Validation(ref msg) if msg.contains("baseline.monthly")));
    }

    #[test]
    fn test_baseline_defaults_optional_components() {
        let baseline: Baseline =
            serde_json::from_value(serde_json::json!({ "monthly": "5000.00" })).unwrap();
        assert_eq!(baseline, Baseline::monthly(dec!(5000.00)));
    }
}
