use crate::errors::ServiceError;
use crate::services::time_tracking::{StartTimerRequest, StopTimerRequest};
use crate::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct ActiveTimerQuery {
    ticket_id: Uuid,
    technician_name: String,
}

async fn start_timer(
    State(state): State<AppState>,
    Json(request): Json<StartTimerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let log = state.services.time_tracking.start_timer(request).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

async fn stop_timer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StopTimerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let log = state.services.time_tracking.stop_timer(id, request).await?;
    Ok(Json(log))
}

async fn get_active_timer(
    State(state): State<AppState>,
    Query(query): Query<ActiveTimerQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let log = state
        .services
        .time_tracking
        .get_active_timer(query.ticket_id, &query.technician_name)
        .await?;
    Ok(Json(log))
}

pub fn time_log_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(start_timer))
        .route("/active", get(get_active_timer))
        .route("/:id/stop", post(stop_timer))
}
