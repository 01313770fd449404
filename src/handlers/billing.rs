use crate::errors::ServiceError;
use crate::services::billing::{CreateBillableItemRequest, CreateSaleRequest};
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

#[derive(Debug, Default, Deserialize)]
struct UnbilledQuery {
    ticket_id: Option<Uuid>,
}

async fn create_billable_item(
    State(state): State<AppState>,
    Json(request): Json<CreateBillableItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.billing.create_billable_item(request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn list_unbilled_items(
    State(state): State<AppState>,
    Query(query): Query<UnbilledQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state
        .services
        .billing
        .get_unbilled_items(query.ticket_id)
        .await?;
    Ok(Json(items))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoice = state
        .services
        .billing
        .get_invoice(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", id)))?;
    Ok(Json(invoice))
}

async fn create_sale(
    State(state): State<AppState>,
    Json(request): Json<CreateSaleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let sale = state.services.billing.create_sale(request).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(create_billable_item))
        .route("/unbilled", get(list_unbilled_items))
        .route("/invoices/:id", get(get_invoice))
        .route("/sales", post(create_sale))
}
