//! Document domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use stipend_shared::types::{DocumentId, StudentId};

use super::error::DocumentError;
use crate::money::check_amount;
use crate::period::DocumentPeriod;

/// Kind of supporting document.
///
/// Administrators may reassign a document's category during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    /// Receipt backing a book allowance claim.
    BookAllowance,
    /// Receipt backing a miscellaneous allowance claim.
    MiscellaneousAllowance,
    /// Monthly narrative report.
    NarrativeReport,
    /// Generic receipt.
    Receipt,
    /// Grade report for the term.
    GradeReport,
    /// Certificate of enrollment / registration.
    EnrollmentCertificate,
    /// Anything else.
    Other,
}

impl DocumentCategory {
    /// All categories, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::BookAllowance,
        Self::MiscellaneousAllowance,
        Self::NarrativeReport,
        Self::Receipt,
        Self::GradeReport,
        Self::EnrollmentCertificate,
        Self::Other,
    ];

    /// Returns the wire representation of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BookAllowance => "BOOK_ALLOWANCE",
            Self::MiscellaneousAllowance => "MISCELLANEOUS_ALLOWANCE",
            Self::NarrativeReport => "NARRATIVE_REPORT",
            Self::Receipt => "RECEIPT",
            Self::GradeReport => "GRADE_REPORT",
            Self::EnrollmentCertificate => "ENROLLMENT_CERTIFICATE",
            Self::Other => "OTHER",
        }
    }

    /// Parses a category from its wire representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL.into_iter().find(|c| c.as_str() == upper)
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A submitted supporting document. Read-only input to allowance generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier.
    pub id: DocumentId,
    /// Owning student.
    pub student_id: StudentId,
    /// Document category.
    pub category: DocumentCategory,
    /// Amount claimed on the document, for receipt-like categories.
    pub claimed_amount: Option<Decimal>,
    /// Period the document is stamped with.
    pub period: DocumentPeriod,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Returns true if the document is stamped with a monthly period.
    #[must_use]
    pub const fn is_monthly(&self) -> bool {
        self.period.is_monthly()
    }

    /// Claimed amount, treating a missing amount as zero.
    #[must_use]
    pub fn amount_or_zero(&self) -> Decimal {
        self.claimed_amount.unwrap_or(Decimal::ZERO)
    }
}

/// Input for recording a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDocumentInput {
    /// Owning student.
    pub student_id: StudentId,
    /// Document category.
    pub category: DocumentCategory,
    /// Claimed amount, if any.
    pub claimed_amount: Option<Decimal>,
    /// Period the document belongs to.
    pub period: DocumentPeriod,
}

impl RecordDocumentInput {
    /// Validates the claimed amount.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Validation` for negative or over-precise amounts.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if let Some(amount) = self.claimed_amount {
            check_amount("claimed_amount", amount).map_err(DocumentError::Validation)?;
        }
        Ok(())
    }
}
