//! Enumerations stored as strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(40))")]
pub enum DocumentCategory {
    #[sea_orm(string_value = "BOOK_ALLOWANCE")]
    BookAllowance,
    #[sea_orm(string_value = "MISCELLANEOUS_ALLOWANCE")]
    MiscellaneousAllowance,
    #[sea_orm(string_value = "NARRATIVE_REPORT")]
    NarrativeReport,
    #[sea_orm(string_value = "RECEIPT")]
    Receipt,
    #[sea_orm(string_value = "GRADE_REPORT")]
    GradeReport,
    #[sea_orm(string_value = "ENROLLMENT_CERTIFICATE")]
    EnrollmentCertificate,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Semester {
    #[sea_orm(string_value = "first")]
    First,
    #[sea_orm(string_value = "second")]
    Second,
    #[sea_orm(string_value = "summer")]
    Summer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum LateSubmissionDecision {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "denied")]
    Denied,
}

impl From<stipend_core::document::DocumentCategory> for DocumentCategory {
    fn from(category: stipend_core::document::DocumentCategory) -> Self {
        use stipend_core::document::DocumentCategory as Core;
        match category {
            Core::BookAllowance => Self::BookAllowance,
            Core::MiscellaneousAllowance => Self::MiscellaneousAllowance,
            Core::NarrativeReport => Self::NarrativeReport,
            Core::Receipt => Self::Receipt,
            Core::GradeReport => Self::GradeReport,
            Core::EnrollmentCertificate => Self::EnrollmentCertificate,
            Core::Other => Self::Other,
        }
    }
}

impl From<DocumentCategory> for stipend_core::document::DocumentCategory {
    fn from(category: DocumentCategory) -> Self {
        match category {
            DocumentCategory::BookAllowance => Self::BookAllowance,
            DocumentCategory::MiscellaneousAllowance => Self::MiscellaneousAllowance,
            DocumentCategory::NarrativeReport => Self::NarrativeReport,
            DocumentCategory::Receipt => Self::Receipt,
            DocumentCategory::GradeReport => Self::GradeReport,
            DocumentCategory::EnrollmentCertificate => Self::EnrollmentCertificate,
            DocumentCategory::Other => Self::Other,
        }
    }
}

impl From<stipend_core::period::Semester> for Semester {
    fn from(semester: stipend_core::period::Semester) -> Self {
        use stipend_core::period::Semester as Core;
        match semester {
            Core::First => Self::First,
            Core::Second => Self::Second,
            Core::Summer => Self::Summer,
        }
    }
}

impl From<Semester> for stipend_core::period::Semester {
    fn from(semester: Semester) -> Self {
        match semester {
            Semester::First => Self::First,
            Semester::Second => Self::Second,
            Semester::Summer => Self::Summer,
        }
    }
}

impl From<stipend_core::late_submission::LateSubmissionDecision> for LateSubmissionDecision {
    fn from(decision: stipend_core::late_submission::LateSubmissionDecision) -> Self {
        use stipend_core::late_submission::LateSubmissionDecision as Core;
        match decision {
            Core::Pending => Self::Pending,
            Core::Approved => Self::Approved,
            Core::Denied => Self::Denied,
        }
    }
}

impl From<LateSubmissionDecision> for stipend_core::late_submission::LateSubmissionDecision {
    fn from(decision: LateSubmissionDecision) -> Self {
        match decision {
            LateSubmissionDecision::Pending => Self::Pending,
            LateSubmissionDecision::Approved => Self::Approved,
            LateSubmissionDecision::Denied => Self::Denied,
        }
    }
}
