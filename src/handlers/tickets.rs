use super::common::PaginationParams;
use crate::errors::ServiceError;
use crate::services::tickets::{CreateTicketRequest, TicketListFilter, UpdateTicketRequest};
use crate::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

async fn create_ticket(
    State(state): State<AppState>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let ticket = state.services.tickets.create_ticket(request).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let ticket = state
        .services
        .tickets
        .get_ticket(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Ticket {} not found", id)))?;
    Ok(Json(ticket))
}

async fn list_tickets(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<TicketListFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let tickets = state
        .services
        .tickets
        .list_tickets(filter, pagination.page, pagination.per_page)
        .await?;
    Ok(Json(tickets))
}

async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTicketRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let ticket = state.services.tickets.update_ticket(id, request).await?;
    Ok(Json(ticket))
}

async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.tickets.delete_ticket(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_ticket_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let entries = state.services.tickets.list_activity(id).await?;
    Ok(Json(entries))
}

async fn list_ticket_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let notes = state.services.repair_notes.list_for_ticket(id).await?;
    Ok(Json(notes))
}

async fn list_ticket_parts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let parts = state.services.parts_orders.list_for_ticket(id).await?;
    Ok(Json(parts))
}

async fn list_ticket_time_logs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let logs = state.services.time_tracking.list_for_ticket(id).await?;
    Ok(Json(logs))
}

async fn list_ticket_invoices(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoices = state.services.billing.list_invoices_for_ticket(id).await?;
    Ok(Json(invoices))
}

async fn generate_ticket_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoice = state.services.billing.generate_invoice_for_ticket(id).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_ticket))
        .route("/", get(list_tickets))
        .route("/:id", get(get_ticket))
        .route("/:id", put(update_ticket))
        .route("/:id", delete(delete_ticket))
        .route("/:id/activity", get(list_ticket_activity))
        .route("/:id/notes", get(list_ticket_notes))
        .route("/:id/parts", get(list_ticket_parts))
        .route("/:id/time-logs", get(list_ticket_time_logs))
        .route("/:id/invoices", get(list_ticket_invoices))
        .route("/:id/invoices", post(generate_ticket_invoice))
}
