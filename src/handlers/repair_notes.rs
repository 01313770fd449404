use crate::errors::ServiceError;
use crate::services::repair_notes::CreateRepairNoteRequest;
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct ResolveRequest {
    #[serde(default = "default_resolved")]
    resolved: bool,
}

fn default_resolved() -> bool {
    true
}

async fn create_note(
    State(state): State<AppState>,
    Json(request): Json<CreateRepairNoteRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let note = state.services.repair_notes.create_note(request).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn resolve_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResolveRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let note = state
        .services
        .repair_notes
        .set_resolved(id, request.resolved)
        .await?;
    Ok(Json(note))
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.repair_notes.delete_note(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn repair_note_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_note))
        .route("/:id/resolve", post(resolve_note))
        .route("/:id", delete(delete_note))
}
