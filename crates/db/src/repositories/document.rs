//! Document store repository.
//!
//! Documents are recorded by students and read by allowance generation.
//! The only mutation after recording is an administrator reassigning the
//! category during review.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use stipend_core::document::{Document, DocumentCategory, DocumentError, RecordDocumentInput};
use stipend_core::period::{DocumentPeriod, MonthPeriod, SemesterPeriod};
use stipend_shared::types::{DocumentId, StudentId};
use tracing::{error, info};

use crate::entities::{documents, sea_orm_active_enums};
use crate::money::{from_centavos, to_centavos};

/// Repository for supporting documents.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a document stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a bad amount or `Database` on storage failure.
    pub async fn record(&self, input: RecordDocumentInput) -> Result<Document, DocumentError> {
        self.record_at(input, Utc::now()).await
    }

    /// Records a document stamped with `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a bad amount or `Database` on storage failure.
    pub async fn record_at(
        &self,
        input: RecordDocumentInput,
        created_at: DateTime<Utc>,
    ) -> Result<Document, DocumentError> {
        input.validate()?;

        let claimed_amount_centavos = input
            .claimed_amount
            .map(to_centavos)
            .transpose()
            .map_err(DocumentError::Validation)?;

        let (is_monthly, period_month, period_year, school_year, semester) = match &input.period {
            DocumentPeriod::Monthly(period) => (
                true,
                Some(month_column(*period)),
                Some(period.year()),
                None,
                None,
            ),
            DocumentPeriod::Semestral(period) => (
                false,
                None,
                None,
                Some(period.school_year.clone()),
                Some(sea_orm_active_enums::Semester::from(period.semester)),
            ),
        };

        let id = DocumentId::new();
        let model = documents::ActiveModel {
            id: Set(id.into_inner()),
            student_id: Set(input.student_id.into_inner()),
            category: Set(input.category.into()),
            claimed_amount_centavos: Set(claimed_amount_centavos),
            is_monthly: Set(is_monthly),
            period_month: Set(period_month),
            period_year: Set(period_year),
            school_year: Set(school_year),
            semester: Set(semester),
            created_at: Set(created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to record document");
            DocumentError::Database(e.to_string())
        })?;

        info!(
            document_id = %id,
            student_id = %input.student_id,
            category = %input.category,
            "document recorded"
        );
        model_to_document(model).map_err(DocumentError::Database)
    }

    /// Finds a document by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or `Database` on storage failure.
    pub async fn find(&self, id: DocumentId) -> Result<Document, DocumentError> {
        let model = documents::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?
            .ok_or(DocumentError::NotFound(id.into_inner()))?;
        model_to_document(model).map_err(DocumentError::Database)
    }

    /// Lists a student's documents stamped with `period`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Database` on storage failure.
    pub async fn list_documents(
        &self,
        student_id: StudentId,
        period: &DocumentPeriod,
    ) -> Result<Vec<Document>, DocumentError> {
        let mut query = documents::Entity::find()
            .filter(documents::Column::StudentId.eq(student_id.into_inner()))
            .filter(documents::Column::IsMonthly.eq(period.is_monthly()));
        query = match period {
            DocumentPeriod::Monthly(p) => query
                .filter(documents::Column::PeriodMonth.eq(month_column(*p)))
                .filter(documents::Column::PeriodYear.eq(p.year())),
            DocumentPeriod::Semestral(p) => query
                .filter(documents::Column::SchoolYear.eq(p.school_year.clone()))
                .filter(
                    documents::Column::Semester.eq(sea_orm_active_enums::Semester::from(p.semester)),
                ),
        };

        query
            .order_by_asc(documents::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?
            .into_iter()
            .map(|m| model_to_document(m).map_err(DocumentError::Database))
            .collect()
    }

    /// Lists all of a student's documents, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Database` on storage failure.
    pub async fn list_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Document>, DocumentError> {
        documents::Entity::find()
            .filter(documents::Column::StudentId.eq(student_id.into_inner()))
            .order_by_desc(documents::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?
            .into_iter()
            .map(|m| model_to_document(m).map_err(DocumentError::Database))
            .collect()
    }

    /// Reassigns a document's category during administrative review.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or `Database` on storage failure.
    pub async fn reassign_category(
        &self,
        id: DocumentId,
        category: DocumentCategory,
    ) -> Result<Document, DocumentError> {
        let model = documents::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?
            .ok_or(DocumentError::NotFound(id.into_inner()))?;

        let previous: DocumentCategory = model.category.into();
        let mut active: documents::ActiveModel = model.into();
        active.category = Set(category.into());
        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?;

        info!(document_id = %id, from = %previous, to = %category, "document category reassigned");
        model_to_document(updated).map_err(DocumentError::Database)
    }
}

/// Loads a student's monthly documents for `period`.
pub(crate) async fn monthly_documents<C: ConnectionTrait>(
    db: &C,
    student_id: StudentId,
    period: MonthPeriod,
) -> Result<Vec<Document>, String> {
    documents::Entity::find()
        .filter(documents::Column::StudentId.eq(student_id.into_inner()))
        .filter(documents::Column::IsMonthly.eq(true))
        .filter(documents::Column::PeriodMonth.eq(month_column(period)))
        .filter(documents::Column::PeriodYear.eq(period.year()))
        .order_by_asc(documents::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(model_to_document)
        .collect()
}

/// Month as stored in an `INTEGER` column.
pub(crate) fn month_column(period: MonthPeriod) -> i32 {
    i32::try_from(period.month()).unwrap_or(0)
}

/// Rebuilds a `MonthPeriod` from stored columns.
pub(crate) fn month_period(month: i32, year: i32) -> Result<MonthPeriod, String> {
    let month = u32::try_from(month).map_err(|_| format!("invalid stored month {month}"))?;
    MonthPeriod::new(month, year).map_err(|e| e.to_string())
}

fn model_to_document(model: documents::Model) -> Result<Document, String> {
    let period = if model.is_monthly {
        match (model.period_month, model.period_year) {
            (Some(month), Some(year)) => DocumentPeriod::Monthly(month_period(month, year)?),
            _ => return Err(format!("document {} has no monthly period", model.id)),
        }
    } else {
        match (model.school_year, model.semester) {
            (Some(school_year), Some(semester)) => DocumentPeriod::Semestral(
                SemesterPeriod::new(&school_year, semester.into()).map_err(|e| e.to_string())?,
            ),
            _ => return Err(format!("document {} has no semester period", model.id)),
        }
    };

    Ok(Document {
        id: DocumentId::from_uuid(model.id),
        student_id: StudentId::from_uuid(model.student_id),
        category: model.category.into(),
        claimed_amount: model.claimed_amount_centavos.map(from_centavos),
        period,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
