//! TicketFlow API: backend for a repair shop management system.
//!
//! The crate is organized in layers:
//! - [`entities`] hold the sea-orm models for clients, devices, tickets and
//!   their satellite tables (parts orders, repair notes, time logs, billing).
//! - [`services`] implement the business rules: ticket numbering, status
//!   transitions, cascading deletes, time tracking, tax math and invoice
//!   generation, and the dashboard aggregates.
//! - [`handlers`] expose the services over HTTP with axum.
//! - [`events`] fan operational events out to an async consumer.

use axum::{http::StatusCode, response::IntoResponse, Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod health;
pub mod migrator;
pub mod services;

pub use config::AppConfig;
pub use errors::ServiceError;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<db::DbPool>,
    pub config: AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Builds the full application router: the versioned API surface plus the
/// health endpoints, wrapped in tracing, CORS, timeout and compression
/// layers.
pub fn app_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let db = state.db.clone();

    let api = Router::new()
        .nest("/clients", handlers::clients::client_routes())
        .nest("/devices", handlers::devices::device_routes())
        .nest("/tickets", handlers::tickets::ticket_routes())
        .nest("/parts-orders", handlers::parts_orders::parts_order_routes())
        .nest("/repair-notes", handlers::repair_notes::repair_note_routes())
        .nest("/reminders", handlers::reminders::reminder_routes())
        .nest("/time-logs", handlers::time_logs::time_log_routes())
        .nest("/billing", handlers::billing::billing_routes())
        .nest("/dashboard", handlers::dashboard::dashboard_routes())
        .with_state(state);

    Router::new()
        .nest("/api/v1", api)
        .merge(health::health_routes(db))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested resource does not exist",
        })),
    )
}
