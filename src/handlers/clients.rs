use super::common::PaginationParams;
use crate::errors::ServiceError;
use crate::services::clients::{CreateClientRequest, UpdateClientRequest};
use crate::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state.services.clients.create_client(request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state
        .services
        .clients
        .get_client(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Client {} not found", id)))?;
    Ok(Json(client))
}

async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let clients = state
        .services
        .clients
        .list_clients(params.page, params.per_page)
        .await?;
    Ok(Json(clients))
}

async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state.services.clients.update_client(id, request).await?;
    Ok(Json(client))
}

async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.clients.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_client_devices(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let devices = state.services.devices.list_for_client(id).await?;
    Ok(Json(devices))
}

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_client))
        .route("/", get(list_clients))
        .route("/:id", get(get_client))
        .route("/:id", put(update_client))
        .route("/:id", delete(delete_client))
        .route("/:id/devices", get(list_client_devices))
}
