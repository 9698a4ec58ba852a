//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for allowances, late-submission requests and documents
//! - Authentication middleware
//! - Error-to-response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use stipend_core::events::EventBus;
use stipend_core::period::PeriodCalendar;
use stipend_db::{AllowanceRepository, DocumentRepository, LateSubmissionRepository};
use stipend_shared::JwtService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Calendar in the scholarship office's time zone.
    pub calendar: PeriodCalendar,
    /// Domain event bus.
    pub events: EventBus,
}

impl AppState {
    /// Allowance repository bound to this state's calendar and event bus.
    #[must_use]
    pub fn allowances(&self) -> AllowanceRepository {
        AllowanceRepository::new((*self.db).clone())
            .with_calendar(self.calendar)
            .with_events(self.events.clone())
    }

    /// Late-submission repository bound to this state's calendar and event bus.
    #[must_use]
    pub fn late_submissions(&self) -> LateSubmissionRepository {
        LateSubmissionRepository::new((*self.db).clone())
            .with_calendar(self.calendar)
            .with_events(self.events.clone())
    }

    /// Document repository.
    #[must_use]
    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new((*self.db).clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
