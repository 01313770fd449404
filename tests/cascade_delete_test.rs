mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use ticketflow_api::entities::{
    activity_log, attachment, client, device, parts_order, repair_note, ticket, time_log,
};
use ticketflow_api::services::parts_orders::CreatePartsOrderRequest;
use ticketflow_api::services::repair_notes::CreateRepairNoteRequest;
use ticketflow_api::services::time_tracking::{StartTimerRequest, StopTimerRequest};
use ticketflow_api::ServiceError;
use uuid::Uuid;

async fn attach_file(app: &common::TestApp, ticket_id: Uuid) {
    attachment::ActiveModel {
        id: Set(Uuid::new_v4()),
        ticket_id: Set(ticket_id),
        file_name: Set("abc123.webp".to_string()),
        original_name: Set("before.jpg".to_string()),
        mime_type: Set("image/webp".to_string()),
        size_bytes: Set(48_213),
        created_at: Set(Utc::now()),
    }
    .insert(&*app.db)
    .await
    .expect("failed to insert attachment");
}

/// Populates a ticket with one row in every dependent table.
async fn populate_ticket(app: &common::TestApp, t: &ticket::Model) {
    let log = app
        .services
        .time_tracking
        .start_timer(StartTimerRequest {
            ticket_id: t.id,
            user_id: "u-1".to_string(),
            technician_name: "Sam".to_string(),
            start_time: None,
            hourly_rate: Some(dec!(80)),
            billable: true,
            notes: None,
        })
        .await
        .unwrap();
    app.services
        .time_tracking
        .stop_timer(log.id, StopTimerRequest::default())
        .await
        .unwrap();

    app.services
        .repair_notes
        .create_note(CreateRepairNoteRequest {
            ticket_id: t.id,
            created_by: "Sam".to_string(),
            note_type: "diagnostic".to_string(),
            priority: None,
            content: "Backlight driver shows intermittent dropout".to_string(),
            tags: None,
        })
        .await
        .unwrap();

    app.services
        .parts_orders
        .create_parts_order(CreatePartsOrderRequest {
            ticket_id: t.id,
            part_name: "Display cable".to_string(),
            supplier: Some("iFixit".to_string()),
            cost: dec!(24.90),
            quantity: 1,
            expected_date: None,
            ordered_by: None,
        })
        .await
        .unwrap();

    attach_file(app, t.id).await;
}

async fn count_children(app: &common::TestApp, ticket_id: Uuid) -> (u64, u64, u64, u64, u64) {
    let db = &*app.db;
    (
        time_log::Entity::find()
            .filter(time_log::Column::TicketId.eq(ticket_id))
            .count(db)
            .await
            .unwrap(),
        repair_note::Entity::find()
            .filter(repair_note::Column::TicketId.eq(ticket_id))
            .count(db)
            .await
            .unwrap(),
        parts_order::Entity::find()
            .filter(parts_order::Column::TicketId.eq(ticket_id))
            .count(db)
            .await
            .unwrap(),
        activity_log::Entity::find()
            .filter(activity_log::Column::TicketId.eq(ticket_id))
            .count(db)
            .await
            .unwrap(),
        attachment::Entity::find()
            .filter(attachment::Column::TicketId.eq(ticket_id))
            .count(db)
            .await
            .unwrap(),
    )
}

#[tokio::test]
async fn deleting_a_ticket_removes_its_dependents_only() {
    let app = common::setup().await;
    let doomed = common::seed_ticket(&app).await;
    let survivor = common::seed_ticket(&app).await;
    populate_ticket(&app, &doomed).await;
    populate_ticket(&app, &survivor).await;

    app.services.tickets.delete_ticket(doomed.id).await.unwrap();

    assert!(ticket::Entity::find_by_id(doomed.id)
        .one(&*app.db)
        .await
        .unwrap()
        .is_none());
    let (logs, notes, parts, activity, _) = count_children(&app, doomed.id).await;
    assert_eq!((logs, notes, parts, activity), (0, 0, 0, 0));

    // The other ticket keeps everything.
    let (logs, notes, parts, activity, files) = count_children(&app, survivor.id).await;
    assert_eq!(logs, 1);
    assert_eq!(notes, 1);
    assert_eq!(parts, 1);
    assert!(activity >= 1);
    assert_eq!(files, 1);
}

#[tokio::test]
async fn deleting_a_missing_ticket_is_not_found() {
    let app = common::setup().await;
    let result = app.services.tickets.delete_ticket(Uuid::new_v4()).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_client_cascades_through_devices_and_tickets() {
    let app = common::setup().await;
    let doomed = common::seed_ticket(&app).await;
    populate_ticket(&app, &doomed).await;
    let unrelated = common::seed_ticket(&app).await;

    app.services
        .clients
        .delete_client(doomed.client_id)
        .await
        .unwrap();

    let db = &*app.db;
    assert!(client::Entity::find_by_id(doomed.client_id)
        .one(db)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        device::Entity::find()
            .filter(device::Column::ClientId.eq(doomed.client_id))
            .count(db)
            .await
            .unwrap(),
        0
    );
    assert!(ticket::Entity::find_by_id(doomed.id)
        .one(db)
        .await
        .unwrap()
        .is_none());
    let (logs, notes, parts, activity, files) = count_children(&app, doomed.id).await;
    assert_eq!((logs, notes, parts, activity, files), (0, 0, 0, 0, 0));

    // A different client's ticket is untouched.
    assert!(ticket::Entity::find_by_id(unrelated.id)
        .one(db)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn deleting_a_client_without_tickets_still_removes_devices() {
    let app = common::setup().await;
    let client_id = common::seed_client(&app).await;
    common::seed_device(&app, client_id).await;

    app.services.clients.delete_client(client_id).await.unwrap();

    let db = &*app.db;
    assert!(client::Entity::find_by_id(client_id)
        .one(db)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        device::Entity::find()
            .filter(device::Column::ClientId.eq(client_id))
            .count(db)
            .await
            .unwrap(),
        0
    );
}
