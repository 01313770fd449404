use crate::errors::ServiceError;
use crate::services::devices::{CreateDeviceRequest, UpdateDeviceRequest};
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

async fn create_device(
    State(state): State<AppState>,
    Json(request): Json<CreateDeviceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let device = state.services.devices.create_device(request).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let device = state
        .services
        .devices
        .get_device(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Device {} not found", id)))?;
    Ok(Json(device))
}

async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDeviceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let device = state.services.devices.update_device(id, request).await?;
    Ok(Json(device))
}

async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.devices.delete_device(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_device))
        .route("/:id", get(get_device))
        .route("/:id", put(update_device))
        .route("/:id", delete(delete_device))
}
