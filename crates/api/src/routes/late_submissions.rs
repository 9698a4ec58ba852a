//! Late-submission request routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use stipend_core::late_submission::{CreateLateSubmissionInput, LateSubmissionDecision};
use stipend_core::period::MonthPeriod;
use stipend_shared::AppError;
use stipend_shared::types::{LateSubmissionId, PageRequest, StudentId, UserId};
use uuid::Uuid;

use crate::error::{json_body, map_app_error, map_late_submission_error};
use crate::{AppState, middleware::AuthUser};

/// Creates the late-submission routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/late-submissions", post(create_request).get(list_requests))
        .route("/late-submissions/{id}/approve", post(approve_request))
        .route("/late-submissions/{id}/deny", post(deny_request))
}

/// Request body for filing a request.
#[derive(Debug, Deserialize)]
pub struct CreateLateSubmissionRequest {
    /// Student the request is for. Students may omit it; administrators must set it.
    pub student_id: Option<Uuid>,
    /// Month, 1..=12.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Justification.
    pub reason: String,
}

/// Request body for approving.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    /// End of the extended document window.
    pub open_until: DateTime<Utc>,
}

/// Query for listing requests.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// "pending", "approved" or "denied".
    pub decision: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// POST `/late-submissions` - File a late-submission request.
async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateLateSubmissionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let student_id = match auth.acting_for(body.student_id) {
        Ok(student_id) => student_id,
        Err(e) => return map_app_error(&e),
    };
    let period = match MonthPeriod::new(body.month, body.year) {
        Ok(period) => period,
        Err(e) => return map_app_error(&AppError::Validation(e.to_string())),
    };

    let input = CreateLateSubmissionInput {
        student_id: StudentId::from_uuid(student_id),
        period,
        reason: body.reason,
    };

    match state.late_submissions().create(input).await {
        Ok(request) => (StatusCode::CREATED, Json(json!(request))).into_response(),
        Err(e) => map_late_submission_error(&e),
    }
}

/// GET `/late-submissions` - List requests (admin).
async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_admin() {
        return response;
    }

    let decision = match query.decision.as_deref() {
        None => None,
        Some(raw) => match LateSubmissionDecision::parse(raw) {
            Some(decision) => Some(decision),
            None => {
                return map_app_error(&AppError::Validation(format!(
                    "Unknown decision '{raw}'"
                )));
            }
        },
    };
    let default = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(default.page),
        per_page: query.per_page.unwrap_or(default.per_page),
    };

    match state.late_submissions().list(decision, page).await {
        Ok(page) => (StatusCode::OK, Json(json!(page))).into_response(),
        Err(e) => map_late_submission_error(&e),
    }
}

/// POST `/late-submissions/{id}/approve` - Approve a pending request (admin).
async fn approve_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_admin() {
        return response;
    }
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };

    match state
        .late_submissions()
        .approve(
            LateSubmissionId::from_uuid(id),
            body.open_until,
            UserId::from_uuid(auth.user_id()),
        )
        .await
    {
        Ok(request) => (StatusCode::OK, Json(json!(request))).into_response(),
        Err(e) => map_late_submission_error(&e),
    }
}

/// POST `/late-submissions/{id}/deny` - Deny a pending request (admin).
async fn deny_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_admin() {
        return response;
    }

    match state
        .late_submissions()
        .deny(
            LateSubmissionId::from_uuid(id),
            UserId::from_uuid(auth.user_id()),
        )
        .await
    {
        Ok(request) => (StatusCode::OK, Json(json!(request))).into_response(),
        Err(e) => map_late_submission_error(&e),
    }
}
