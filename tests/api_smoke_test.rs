mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use ticketflow_api::{app_router, AppConfig, AppState};
use uuid::Uuid;

/// Builds the full router on top of the usual in-memory harness.
async fn test_app() -> axum::Router {
    let app = common::setup().await;
    let (tx, rx) = tokio::sync::mpsc::channel(16);
    tokio::spawn(ticketflow_api::events::process_events(rx));
    let state = AppState {
        db: app.db.clone(),
        config: AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            8080,
            "test".to_string(),
        ),
        event_sender: ticketflow_api::events::EventSender::new(tx),
        services: app.services.clone(),
    };
    app_router(state)
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn client_creation_round_trips_over_http() {
    let app = test_app().await;

    let body = json!({
        "name": "Grace Hopper",
        "email": "grace@example.com"
    });
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/v1/clients")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(Request::get("/api/v1/clients").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_resources_map_to_404() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/v1/tickets/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validation_failures_map_to_400() {
    let app = test_app().await;

    // Empty name fails request validation.
    let body = json!({ "name": "" });
    let response = app
        .oneshot(
            Request::post("/api/v1/clients")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_stats_is_served() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::get("/api/v1/dashboard/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
