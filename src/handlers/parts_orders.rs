use crate::errors::ServiceError;
use crate::services::parts_orders::{CreatePartsOrderRequest, UpdatePartsOrderRequest};
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

async fn create_parts_order(
    State(state): State<AppState>,
    Json(request): Json<CreatePartsOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.parts_orders.create_parts_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_parts_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state
        .services
        .parts_orders
        .get_parts_order(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Parts order {} not found", id)))?;
    Ok(Json(order))
}

async fn update_parts_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePartsOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state
        .services
        .parts_orders
        .update_parts_order(id, request)
        .await?;
    Ok(Json(order))
}

async fn delete_parts_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.parts_orders.delete_parts_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn parts_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_parts_order))
        .route("/:id", get(get_parts_order))
        .route("/:id", put(update_parts_order))
        .route("/:id", delete(delete_parts_order))
}
