//! Stipend API Server
//!
//! Main entry point for the scholarship allowance service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stipend_api::{AppState, create_router};
use stipend_core::events::EventBus;
use stipend_core::period::PeriodCalendar;
use stipend_db::connect;
use stipend_shared::{AppConfig, JwtService};

/// Logs every domain event until the bus closes.
fn spawn_event_log(events: &EventBus) {
    let mut receiver = events.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => info!(
                    kind = event.kind(),
                    student_id = %event.student_id(),
                    "domain event"
                ),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stipend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let calendar = PeriodCalendar::from_name(&config.allowance.timezone)?;
    info!(timezone = %config.allowance.timezone, "Allowance calendar configured");

    let db = connect(&config.database).await?;
    info!("Connected to database");

    let events = EventBus::default();
    spawn_event_log(&events);

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
        calendar,
        events,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
