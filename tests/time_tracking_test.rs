mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use ticketflow_api::services::time_tracking::{StartTimerRequest, StopTimerRequest};
use ticketflow_api::ServiceError;
use uuid::Uuid;

fn start_request(ticket_id: Uuid, technician: &str) -> StartTimerRequest {
    StartTimerRequest {
        ticket_id,
        user_id: "u-1".to_string(),
        technician_name: technician.to_string(),
        start_time: None,
        hourly_rate: Some(dec!(60)),
        billable: true,
        notes: None,
    }
}

#[tokio::test]
async fn stopping_derives_duration_and_labor_cost() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let start = Utc::now() - Duration::hours(1);
    let log = app
        .services
        .time_tracking
        .start_timer(StartTimerRequest {
            start_time: Some(start),
            ..start_request(ticket.id, "Sam")
        })
        .await
        .unwrap();
    assert!(log.end_time.is_none());
    assert!(log.duration_seconds.is_none());

    let end = start + Duration::seconds(1800);
    let stopped = app
        .services
        .time_tracking
        .stop_timer(log.id, StopTimerRequest {
            end_time: Some(end),
        })
        .await
        .unwrap();

    assert_eq!(stopped.duration_seconds, Some(1800));
    assert_eq!(stopped.labor_cost, Some(dec!(30.00)));
    assert_eq!(stopped.end_time, Some(end));
}

#[tokio::test]
async fn sub_second_remainder_is_truncated() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let start = Utc::now() - Duration::minutes(5);
    let log = app
        .services
        .time_tracking
        .start_timer(StartTimerRequest {
            start_time: Some(start),
            ..start_request(ticket.id, "Sam")
        })
        .await
        .unwrap();

    let end = start + Duration::milliseconds(90_999);
    let stopped = app
        .services
        .time_tracking
        .stop_timer(log.id, StopTimerRequest {
            end_time: Some(end),
        })
        .await
        .unwrap();
    assert_eq!(stopped.duration_seconds, Some(90));
}

#[tokio::test]
async fn second_start_for_same_technician_conflicts() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    app.services
        .time_tracking
        .start_timer(start_request(ticket.id, "Sam"))
        .await
        .unwrap();

    let result = app
        .services
        .time_tracking
        .start_timer(start_request(ticket.id, "Sam"))
        .await;
    assert_matches!(result, Err(ServiceError::Conflict(_)));

    // A different technician on the same ticket is fine.
    app.services
        .time_tracking
        .start_timer(start_request(ticket.id, "Alex"))
        .await
        .unwrap();
}

#[tokio::test]
async fn active_timer_lookup_matches_the_open_session() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    assert!(app
        .services
        .time_tracking
        .get_active_timer(ticket.id, "Sam")
        .await
        .unwrap()
        .is_none());

    let log = app
        .services
        .time_tracking
        .start_timer(start_request(ticket.id, "Sam"))
        .await
        .unwrap();

    let active = app
        .services
        .time_tracking
        .get_active_timer(ticket.id, "Sam")
        .await
        .unwrap()
        .expect("timer should be active");
    assert_eq!(active.id, log.id);

    app.services
        .time_tracking
        .stop_timer(log.id, StopTimerRequest::default())
        .await
        .unwrap();
    assert!(app
        .services
        .time_tracking
        .get_active_timer(ticket.id, "Sam")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn stopping_twice_is_an_invalid_operation() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let log = app
        .services
        .time_tracking
        .start_timer(start_request(ticket.id, "Sam"))
        .await
        .unwrap();
    app.services
        .time_tracking
        .stop_timer(log.id, StopTimerRequest::default())
        .await
        .unwrap();

    let result = app
        .services
        .time_tracking
        .stop_timer(log.id, StopTimerRequest::default())
        .await;
    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn stopping_an_unknown_timer_is_not_found() {
    let app = common::setup().await;
    let result = app
        .services
        .time_tracking
        .stop_timer(Uuid::new_v4(), StopTimerRequest::default())
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn end_before_start_is_rejected() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let start = Utc::now();
    let log = app
        .services
        .time_tracking
        .start_timer(StartTimerRequest {
            start_time: Some(start),
            ..start_request(ticket.id, "Sam")
        })
        .await
        .unwrap();

    let result = app
        .services
        .time_tracking
        .stop_timer(log.id, StopTimerRequest {
            end_time: Some(start - Duration::seconds(10)),
        })
        .await;
    assert_matches!(result, Err(ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn non_billable_sessions_carry_no_labor_cost() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let log = app
        .services
        .time_tracking
        .start_timer(StartTimerRequest {
            billable: false,
            ..start_request(ticket.id, "Sam")
        })
        .await
        .unwrap();
    let stopped = app
        .services
        .time_tracking
        .stop_timer(log.id, StopTimerRequest::default())
        .await
        .unwrap();

    assert!(stopped.duration_seconds.is_some());
    assert_eq!(stopped.labor_cost, None);
}

#[tokio::test]
async fn starting_on_a_missing_ticket_is_not_found() {
    let app = common::setup().await;
    let result = app
        .services
        .time_tracking
        .start_timer(start_request(Uuid::new_v4(), "Sam"))
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}
