//! Allowance generation, preview and claim routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use stipend_core::allowance::{Baseline, GenerateAllowanceInput};
use stipend_core::period::Semester;
use stipend_shared::AppError;
use stipend_shared::types::{AllowanceId, PageRequest, StudentId};
use uuid::Uuid;

use crate::error::{json_body, map_allowance_error, map_app_error};
use crate::{AppState, middleware::AuthUser};

/// Creates the allowance routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/allowances/generate", post(generate_allowance))
        .route("/allowances/preview", post(preview_allowance))
        .route("/allowances/{id}", get(get_allowance))
        .route("/allowances/{id}/claim", post(claim_allowance))
        .route("/students/{student_id}/allowances", get(list_student_allowances))
}

/// Baseline amounts as entered by an administrator.
#[derive(Debug, Deserialize)]
pub struct BaselineRequest {
    /// Baseline monthly stipend (required).
    pub monthly: Option<Decimal>,
    /// Baseline book allowance.
    pub book: Option<Decimal>,
    /// Baseline miscellaneous allowance.
    pub misc: Option<Decimal>,
    /// Thesis allowance.
    pub thesis: Option<Decimal>,
}

/// Request body for generate and preview.
#[derive(Debug, Deserialize)]
pub struct GenerateAllowanceRequest {
    /// The student.
    pub student_id: Uuid,
    /// Month, 1..=12.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Semester: "first", "second" or "summer".
    pub semester: String,
    /// Year level, 1..=6.
    pub year_level: u8,
    /// Baseline amounts.
    pub baseline: BaselineRequest,
}

impl GenerateAllowanceRequest {
    fn into_input(self) -> Result<GenerateAllowanceInput, AppError> {
        let monthly = self
            .baseline
            .monthly
            .ok_or_else(|| AppError::Validation("baseline.monthly is required".to_string()))?;
        let semester =
            Semester::parse(&self.semester).map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(GenerateAllowanceInput {
            student_id: StudentId::from_uuid(self.student_id),
            month: self.month,
            year: self.year,
            semester,
            year_level: self.year_level,
            baseline: Baseline {
                monthly,
                book: self.baseline.book,
                misc: self.baseline.misc,
                thesis: self.baseline.thesis,
            },
        })
    }
}

/// Request body for claiming.
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    /// Must be exactly "confirm".
    #[serde(default)]
    pub confirmation: String,
}

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Converts to a page request, applying defaults.
    #[must_use]
    pub fn to_request(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(default.page),
            per_page: self.per_page.unwrap_or(default.per_page),
        }
        .normalized()
    }
}

fn generate_input(
    payload: Result<Json<GenerateAllowanceRequest>, JsonRejection>,
) -> Result<GenerateAllowanceInput, Response> {
    json_body(payload)?
        .into_input()
        .map_err(|e| map_app_error(&e))
}

/// POST `/allowances/generate` - Generate the allowance for the eligible period.
async fn generate_allowance(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<GenerateAllowanceRequest>, JsonRejection>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    let input = match generate_input(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    match state.allowances().generate(input).await {
        Ok(allowance) => (StatusCode::CREATED, Json(json!(allowance))).into_response(),
        Err(e) => map_allowance_error(&e),
    }
}

/// POST `/allowances/preview` - Compute what generate would persist.
async fn preview_allowance(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<GenerateAllowanceRequest>, JsonRejection>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    let input = match generate_input(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    match state.allowances().preview(input).await {
        Ok(preview) => (StatusCode::OK, Json(json!(preview))).into_response(),
        Err(e) => map_allowance_error(&e),
    }
}

/// GET `/allowances/{id}` - Fetch one allowance.
async fn get_allowance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.allowances().find(AllowanceId::from_uuid(id)).await {
        Ok(allowance) => {
            if let Err(response) = auth.require_access_to(allowance.student_id.into_inner()) {
                return response;
            }
            (StatusCode::OK, Json(json!(allowance))).into_response()
        }
        Err(e) => map_allowance_error(&e),
    }
}

/// POST `/allowances/{id}/claim` - Claim an allowance.
async fn claim_allowance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<ClaimRequest>, JsonRejection>,
) -> impl IntoResponse {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let repo = state.allowances();
    let id = AllowanceId::from_uuid(id);

    let allowance = match repo.find(id).await {
        Ok(allowance) => allowance,
        Err(e) => return map_allowance_error(&e),
    };
    if let Err(response) = auth.require_access_to(allowance.student_id.into_inner()) {
        return response;
    }

    match repo.claim(id, &body.confirmation).await {
        Ok(claimed) => (StatusCode::OK, Json(json!(claimed))).into_response(),
        Err(e) => map_allowance_error(&e),
    }
}

/// GET `/students/{student_id}/allowances` - List a student's allowances.
async fn list_student_allowances(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_access_to(student_id) {
        return response;
    }

    match state
        .allowances()
        .list_for_student(StudentId::from_uuid(student_id), query.to_request())
        .await
    {
        Ok(page) => (StatusCode::OK, Json(json!(page))).into_response(),
        Err(e) => map_allowance_error(&e),
    }
}
