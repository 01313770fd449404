mod common;

use assert_matches::assert_matches;
use chrono::{Datelike, Utc};
use ticketflow_api::services::tickets::{CreateTicketRequest, UpdateTicketRequest};
use ticketflow_api::ServiceError;

#[tokio::test]
async fn new_tickets_get_sequential_yearly_numbers() {
    let app = common::setup().await;
    let year = Utc::now().year();

    let first = common::seed_ticket(&app).await;
    assert_eq!(first.ticket_number, format!("TF-{}-001", year));
    assert_eq!(first.status, "received");
    assert_eq!(first.priority, "medium");
    assert!(first.completed_at.is_none());

    let second = app
        .services
        .tickets
        .create_ticket(CreateTicketRequest {
            client_id: first.client_id,
            device_id: first.device_id,
            title: "Battery drains overnight".to_string(),
            description: None,
            priority: Some("high".to_string()),
            estimated_cost: None,
            created_by: None,
        })
        .await
        .unwrap();
    assert_eq!(second.ticket_number, format!("TF-{}-002", year));
    assert_eq!(second.priority, "high");
}

#[tokio::test]
async fn creation_writes_a_single_activity_entry() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let activity = app.services.tickets.list_activity(ticket.id).await.unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].activity_type, "created");
    assert_eq!(activity[0].performed_by.as_deref(), Some("front-desk"));
}

#[tokio::test]
async fn status_change_appends_exactly_one_activity_entry() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let updated = app
        .services
        .tickets
        .update_ticket(
            ticket.id,
            UpdateTicketRequest {
                status: Some("diagnosed".to_string()),
                performed_by: Some("tech-1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, "diagnosed");

    let activity = app.services.tickets.list_activity(ticket.id).await.unwrap();
    assert_eq!(activity.len(), 2);
    let entry = &activity[1];
    assert_eq!(entry.activity_type, "status_change");
    assert_eq!(entry.description, "Status changed from received to diagnosed");
    assert_eq!(entry.performed_by.as_deref(), Some("tech-1"));
}

#[tokio::test]
async fn update_without_status_change_logs_nothing() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    // No status field at all.
    app.services
        .tickets
        .update_ticket(
            ticket.id,
            UpdateTicketRequest {
                title: Some("Screen flickers constantly".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Same status sent explicitly.
    app.services
        .tickets
        .update_ticket(
            ticket.id,
            UpdateTicketRequest {
                status: Some("received".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let activity = app.services.tickets.list_activity(ticket.id).await.unwrap();
    assert_eq!(activity.len(), 1, "only the creation entry should exist");
}

#[tokio::test]
async fn completing_stamps_completed_at_and_reopening_keeps_it() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let completed = app
        .services
        .tickets
        .update_ticket(
            ticket.id,
            UpdateTicketRequest {
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let stamp = completed.completed_at.expect("completed_at must be set");

    let reopened = app
        .services
        .tickets
        .update_ticket(
            ticket.id,
            UpdateTicketRequest {
                status: Some("in_progress".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reopened.status, "in_progress");
    assert_eq!(reopened.completed_at, Some(stamp));
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let result = app
        .services
        .tickets
        .update_ticket(
            ticket.id,
            UpdateTicketRequest {
                status: Some("exploded".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::InvalidStatus(_)));
}

#[tokio::test]
async fn updating_a_missing_ticket_is_not_found() {
    let app = common::setup().await;
    let result = app
        .services
        .tickets
        .update_ticket(uuid::Uuid::new_v4(), UpdateTicketRequest::default())
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}
