//! Document store routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use stipend_core::document::{DocumentCategory, RecordDocumentInput};
use stipend_core::period::{DocumentPeriod, MonthPeriod, Semester, SemesterPeriod};
use stipend_shared::AppError;
use stipend_shared::types::{DocumentId, StudentId};
use uuid::Uuid;

use crate::error::{json_body, map_app_error, map_document_error};
use crate::{AppState, middleware::AuthUser};

/// Creates the document routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(record_document))
        .route("/documents/{id}/category", patch(reassign_category))
        .route("/students/{student_id}/documents", get(list_student_documents))
}

/// Period selector: `month` + `year`, or `school_year` + `semester`.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodParams {
    /// Month, 1..=12.
    pub month: Option<u32>,
    /// Year.
    pub year: Option<i32>,
    /// School year, `YYYY-YYYY`.
    pub school_year: Option<String>,
    /// Semester: "first", "second" or "summer".
    pub semester: Option<String>,
}

impl PeriodParams {
    /// Resolves the period, if one was given.
    fn resolve(&self) -> Result<Option<DocumentPeriod>, AppError> {
        let invalid = |e: stipend_core::period::PeriodError| AppError::Validation(e.to_string());
        match (self.month, self.year, &self.school_year, &self.semester) {
            (Some(month), Some(year), None, None) => Ok(Some(DocumentPeriod::Monthly(
                MonthPeriod::new(month, year).map_err(invalid)?,
            ))),
            (None, None, Some(school_year), Some(semester)) => {
                let semester = Semester::parse(semester).map_err(invalid)?;
                Ok(Some(DocumentPeriod::Semestral(
                    SemesterPeriod::new(school_year, semester).map_err(invalid)?,
                )))
            }
            (None, None, None, None) => Ok(None),
            _ => Err(AppError::Validation(
                "Provide either month and year, or school_year and semester".to_string(),
            )),
        }
    }
}

/// Request body for recording a document.
#[derive(Debug, Deserialize)]
pub struct RecordDocumentRequest {
    /// Owning student. Students may omit it; administrators must set it.
    pub student_id: Option<Uuid>,
    /// Category, e.g. "BOOK_ALLOWANCE".
    pub category: String,
    /// Amount claimed on the document.
    pub claimed_amount: Option<Decimal>,
    /// Period the document belongs to.
    #[serde(flatten)]
    pub period: PeriodParams,
}

/// Request body for reassigning a category.
#[derive(Debug, Deserialize)]
pub struct ReassignCategoryRequest {
    /// New category.
    pub category: String,
}

fn parse_category(raw: &str) -> Result<DocumentCategory, AppError> {
    DocumentCategory::parse(raw)
        .ok_or_else(|| AppError::Validation(format!("Unknown document category '{raw}'")))
}

fn record_input(
    auth: &AuthUser,
    body: &RecordDocumentRequest,
) -> Result<RecordDocumentInput, AppError> {
    let student_id = auth.acting_for(body.student_id)?;
    let category = parse_category(&body.category)?;
    let period = body
        .period
        .resolve()?
        .ok_or_else(|| AppError::Validation("A document period is required".to_string()))?;
    Ok(RecordDocumentInput {
        student_id: StudentId::from_uuid(student_id),
        category,
        claimed_amount: body.claimed_amount,
        period,
    })
}

/// POST `/documents` - Record a supporting document.
async fn record_document(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<RecordDocumentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let input = match record_input(&auth, &body) {
        Ok(input) => input,
        Err(e) => return map_app_error(&e),
    };

    match state.documents().record(input).await {
        Ok(document) => (StatusCode::CREATED, Json(json!(document))).into_response(),
        Err(e) => map_document_error(&e),
    }
}

/// GET `/students/{student_id}/documents` - List a student's documents,
/// optionally for one period.
async fn list_student_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PeriodParams>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_access_to(student_id) {
        return response;
    }
    let period = match params.resolve() {
        Ok(period) => period,
        Err(e) => return map_app_error(&e),
    };

    let repo = state.documents();
    let student_id = StudentId::from_uuid(student_id);
    let result = match &period {
        Some(period) => repo.list_documents(student_id, period).await,
        None => repo.list_for_student(student_id).await,
    };

    match result {
        Ok(documents) => (StatusCode::OK, Json(json!({ "documents": documents }))).into_response(),
        Err(e) => map_document_error(&e),
    }
}

/// PATCH `/documents/{id}/category` - Reassign a document's category (admin).
async fn reassign_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<ReassignCategoryRequest>, JsonRejection>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let category = match parse_category(&body.category) {
        Ok(category) => category,
        Err(e) => return map_app_error(&e),
    };

    match state
        .documents()
        .reassign_category(DocumentId::from_uuid(id), category)
        .await
    {
        Ok(document) => (StatusCode::OK, Json(json!(document))).into_response(),
        Err(e) => map_document_error(&e),
    }
}
