//! Mapping of domain errors to HTTP responses.
//!
//! Bodies are `{"error": <code>, "message": <text>}`. Storage failures are
//! logged and reported with a generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use stipend_core::allowance::AllowanceError;
use stipend_core::document::DocumentError;
use stipend_core::late_submission::LateSubmissionError;
use stipend_shared::AppError;
use tracing::error;

/// Builds an error response.
pub fn error_response(status: u16, code: &str, message: impl Into<String>) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": code.to_lowercase(),
            "message": message.into(),
        })),
    )
        .into_response()
}

fn internal_error(detail: &str) -> Response {
    error!(error = %detail, "storage failure");
    error_response(500, "internal_error", "An error occurred")
}

/// Maps allowance errors to HTTP responses.
pub fn map_allowance_error(e: &AllowanceError) -> Response {
    match e {
        AllowanceError::Database(detail) => internal_error(detail),
        _ => error_response(e.status_code(), e.error_code(), e.to_string()),
    }
}

/// Maps late-submission errors to HTTP responses.
pub fn map_late_submission_error(e: &LateSubmissionError) -> Response {
    match e {
        LateSubmissionError::Database(detail) => internal_error(detail),
        _ => error_response(e.status_code(), e.error_code(), e.to_string()),
    }
}

/// Maps document errors to HTTP responses.
pub fn map_document_error(e: &DocumentError) -> Response {
    match e {
        DocumentError::Database(detail) => internal_error(detail),
        _ => error_response(e.status_code(), e.error_code(), e.to_string()),
    }
}

/// Maps application errors to HTTP responses.
pub fn map_app_error(e: &AppError) -> Response {
    error_response(e.status_code(), e.error_code(), e.to_string())
}

/// Unwraps a JSON body, turning a malformed or incomplete body into a 400.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| map_app_error(&AppError::Validation(rejection.body_text())))
}
