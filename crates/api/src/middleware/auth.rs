//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use crate::error::error_response;
use stipend_shared::{AppError, Claims, JwtError, Role};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    // Validate token
    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            // Store claims in request extensions
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (status, error, message) = match e {
                JwtError::Expired => (
                    StatusCode::UNAUTHORIZED,
                    "token_expired",
                    "Token has expired",
                ),
                _ => (
                    StatusCode::UNAUTHORIZED,
                    "invalid_token",
                    "Invalid or malformed token",
                ),
            };

            (status, Json(json!({ "error": error, "message": message }))).into_response()
        }
    }
}

/// Extractor for authenticated user claims.
///
/// Use this in handlers to get the caller's identity:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     if let Err(response) = auth.require_admin() {
///         return response;
///     }
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> uuid::Uuid {
        self.0.user_id()
    }

    /// Returns the caller's role, if recognised.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.0.role()
    }

    /// Returns true if the caller is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// Rejects callers that are not administrators.
    #[allow(clippy::result_large_err)]
    pub fn require_admin(&self) -> Result<(), Response> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(error_response(
                403,
                "forbidden",
                "Administrator role required",
            ))
        }
    }

    /// Rejects callers that may not act on records owned by `student_id`.
    #[allow(clippy::result_large_err)]
    pub fn require_access_to(&self, student_id: uuid::Uuid) -> Result<(), Response> {
        if self.0.can_act_for(student_id) {
            Ok(())
        } else {
            Err(error_response(
                403,
                "forbidden",
                "You do not have access to this student's records",
            ))
        }
    }

    /// Resolves the student a record is being filed for.
    ///
    /// Students file for themselves and may omit `requested`; administrators
    /// file on behalf of a student and must name one.
    pub fn acting_for(&self, requested: Option<uuid::Uuid>) -> Result<uuid::Uuid, AppError> {
        match (self.is_admin(), requested) {
            (true, Some(student_id)) => Ok(student_id),
            (true, None) => Err(AppError::Validation(
                "student_id is required when filing on behalf of a student".to_string(),
            )),
            (false, Some(student_id)) if student_id != self.user_id() => Err(
                AppError::Forbidden("Students may only file for themselves".to_string()),
            ),
            (false, _) if self.role() == Some(Role::Student) => Ok(self.user_id()),
            (false, _) => Err(AppError::Forbidden("Unrecognised role".to_string())),
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn user(role: Role) -> AuthUser {
        AuthUser(Claims::new(Uuid::new_v4(), role, Utc::now() + Duration::hours(1)))
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_require_admin() {
        assert!(user(Role::Admin).require_admin().is_ok());
        let denied = user(Role::Student).require_admin().unwrap_err();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_students_access_only_themselves() {
        let student = user(Role::Student);
        assert!(student.require_access_to(student.user_id()).is_ok());
        assert!(student.require_access_to(Uuid::new_v4()).is_err());
        assert!(user(Role::Admin).require_access_to(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_student_files_for_self() {
        let student = user(Role::Student);
        assert_eq!(student.acting_for(None).unwrap(), student.user_id());
        assert_eq!(
            student.acting_for(Some(student.user_id())).unwrap(),
            student.user_id()
        );
        assert!(matches!(
            student.acting_for(Some(Uuid::new_v4())),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_must_name_student() {
        let admin = user(Role::Admin);
        assert!(matches!(admin.acting_for(None), Err(AppError::Validation(_))));
        let student_id = Uuid::new_v4();
        assert_eq!(admin.acting_for(Some(student_id)).unwrap(), student_id);
    }
}
