#![allow(dead_code)]

//! Shared harness for integration tests: an in-memory SQLite database
//! created through the real migrations, plus the full service container.

use rust_decimal::Decimal;
use std::sync::Arc;
use ticketflow_api::db::{establish_connection_with_config, run_migrations, DbConfig, DbPool};
use ticketflow_api::entities::ticket;
use ticketflow_api::events::{process_events, EventSender};
use ticketflow_api::handlers::AppServices;
use ticketflow_api::services::clients::CreateClientRequest;
use ticketflow_api::services::devices::CreateDeviceRequest;
use ticketflow_api::services::tickets::CreateTicketRequest;
use tokio::sync::mpsc;
use uuid::Uuid;

pub struct TestApp {
    pub db: Arc<DbPool>,
    pub services: AppServices,
}

pub async fn setup() -> TestApp {
    setup_with_tax(Decimal::ZERO).await
}

pub async fn setup_with_tax(default_tax_rate: Decimal) -> TestApp {
    // In-memory SQLite is per-connection, so the pool is pinned to one.
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = Arc::new(
        establish_connection_with_config(&config)
            .await
            .expect("failed to open in-memory database"),
    );
    run_migrations(&db).await.expect("migrations failed");

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(process_events(rx));
    let services = AppServices::new(db.clone(), Arc::new(EventSender::new(tx)), default_tax_rate);

    TestApp { db, services }
}

pub async fn seed_client(app: &TestApp) -> Uuid {
    app.services
        .clients
        .create_client(CreateClientRequest {
            name: "Ada Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            address: None,
            notes: None,
        })
        .await
        .expect("failed to seed client")
        .id
}

pub async fn seed_device(app: &TestApp, client_id: Uuid) -> Uuid {
    app.services
        .devices
        .create_device(CreateDeviceRequest {
            client_id,
            device_type: "laptop".to_string(),
            brand: "Framework".to_string(),
            model: "13".to_string(),
            serial_number: Some("FRW-1234".to_string()),
            notes: None,
        })
        .await
        .expect("failed to seed device")
        .id
}

/// Creates a client, a device, and a ticket in one go.
pub async fn seed_ticket(app: &TestApp) -> ticket::Model {
    let client_id = seed_client(app).await;
    let device_id = seed_device(app, client_id).await;
    app.services
        .tickets
        .create_ticket(CreateTicketRequest {
            client_id,
            device_id,
            title: "Screen flickers at low brightness".to_string(),
            description: Some("Started after the last firmware update".to_string()),
            priority: None,
            estimated_cost: None,
            created_by: Some("front-desk".to_string()),
        })
        .await
        .expect("failed to seed ticket")
}
