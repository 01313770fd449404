use crate::errors::ServiceError;
use crate::AppState;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::get,
    Router,
};

async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let stats = state.services.dashboard.get_dashboard_stats().await?;
    Ok(Json(stats))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}
