use crate::errors::ServiceError;
use crate::services::reminders::{CreateReminderRequest, ReminderListFilter};
use crate::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use uuid::Uuid;

async fn create_reminder(
    State(state): State<AppState>,
    Json(request): Json<CreateReminderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let reminder = state.services.reminders.create_reminder(request).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

async fn list_reminders(
    State(state): State<AppState>,
    Query(filter): Query<ReminderListFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let reminders = state.services.reminders.list_reminders(filter).await?;
    Ok(Json(reminders))
}

async fn complete_reminder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let reminder = state.services.reminders.complete_reminder(id).await?;
    Ok(Json(reminder))
}

async fn delete_reminder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.reminders.delete_reminder(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn reminder_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_reminder))
        .route("/", get(list_reminders))
        .route("/:id/complete", post(complete_reminder))
        .route("/:id", delete(delete_reminder))
}
