use crate::{
    db::DbPool,
    entities::ticket,
    entities::time_log,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct StartTimerRequest {
    pub ticket_id: Uuid,
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "Technician name is required"))]
    pub technician_name: String,
    /// Defaults to now when not supplied.
    pub start_time: Option<DateTime<Utc>>,
    pub hourly_rate: Option<Decimal>,
    #[serde(default = "default_billable")]
    pub billable: bool,
    pub notes: Option<String>,
}

fn default_billable() -> bool {
    true
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StopTimerRequest {
    /// Defaults to now when not supplied.
    pub end_time: Option<DateTime<Utc>>,
}

/// The single authoritative labor-cost policy: the hourly rate divided to a
/// per-minute rate, applied to the fractional minute count.
pub fn labor_cost(hourly_rate: Decimal, duration_seconds: i64) -> Decimal {
    let minutes = Decimal::from(duration_seconds) / Decimal::from(60);
    (hourly_rate / Decimal::from(60) * minutes).round_dp(2)
}

/// Whole elapsed seconds between start and stop, truncated.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds()
}

/// Tracks billable work sessions per ticket and technician.
#[derive(Clone)]
pub struct TimeTrackingService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl TimeTrackingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Opens a work session. At most one session per (ticket, technician)
    /// may be running; the check runs inside the insert transaction and the
    /// partial unique index backs it against concurrent starts.
    #[instrument(skip(self, request), fields(ticket_id = %request.ticket_id))]
    pub async fn start_timer(
        &self,
        request: StartTimerRequest,
    ) -> Result<time_log::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;

        let owner = ticket::Entity::find_by_id(request.ticket_id).one(db).await?;
        if owner.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Ticket {} not found",
                request.ticket_id
            )));
        }

        let txn = db.begin().await?;

        let active = time_log::Entity::find()
            .filter(time_log::Column::TicketId.eq(request.ticket_id))
            .filter(time_log::Column::TechnicianName.eq(request.technician_name.clone()))
            .filter(time_log::Column::EndTime.is_null())
            .one(&txn)
            .await?;
        if active.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Technician {} already has a running timer on ticket {}",
                request.technician_name, request.ticket_id
            )));
        }

        let now = Utc::now();
        let insert = time_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            ticket_id: Set(request.ticket_id),
            user_id: Set(request.user_id),
            technician_name: Set(request.technician_name),
            start_time: Set(request.start_time.unwrap_or(now)),
            end_time: Set(None),
            duration_seconds: Set(None),
            hourly_rate: Set(request.hourly_rate),
            labor_cost: Set(None),
            billable: Set(request.billable),
            notes: Set(request.notes),
            created_at: Set(now),
        }
        .insert(&txn)
        .await;

        let model = match insert {
            Ok(model) => model,
            // A concurrent start hitting the partial unique index lands here.
            Err(db_err)
                if matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                return Err(ServiceError::Conflict(
                    "A timer is already running for this ticket and technician".into(),
                ));
            }
            Err(db_err) => return Err(ServiceError::DatabaseError(db_err)),
        };

        txn.commit().await?;

        info!(time_log_id = %model.id, "Timer started");
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender
                .send(Event::TimerStarted {
                    time_log_id: model.id,
                    ticket_id: model.ticket_id,
                })
                .await
            {
                warn!(error = %e, "Failed to send timer started event");
            }
        }
        Ok(model)
    }

    /// Closes a work session, deriving duration and labor cost.
    #[instrument(skip(self, request))]
    pub async fn stop_timer(
        &self,
        time_log_id: Uuid,
        request: StopTimerRequest,
    ) -> Result<time_log::Model, ServiceError> {
        let db = &*self.db_pool;

        let current = time_log::Entity::find_by_id(time_log_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Time log {} not found", time_log_id)))?;

        if current.end_time.is_some() {
            return Err(ServiceError::InvalidOperation(format!(
                "Time log {} is already stopped",
                time_log_id
            )));
        }

        let end_time = request.end_time.unwrap_or_else(Utc::now);
        if end_time < current.start_time {
            return Err(ServiceError::InvalidInput(
                "End time cannot precede start time".into(),
            ));
        }

        let duration = elapsed_seconds(current.start_time, end_time);
        let cost = match (current.billable, current.hourly_rate) {
            (true, Some(rate)) => Some(labor_cost(rate, duration)),
            _ => None,
        };

        let ticket_id = current.ticket_id;
        let mut active: time_log::ActiveModel = current.into();
        active.end_time = Set(Some(end_time));
        active.duration_seconds = Set(Some(duration));
        active.labor_cost = Set(cost);
        let model = active.update(db).await?;

        info!(time_log_id = %model.id, duration, "Timer stopped");
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender
                .send(Event::TimerStopped {
                    time_log_id: model.id,
                    ticket_id,
                    duration_seconds: duration,
                })
                .await
            {
                warn!(error = %e, "Failed to send timer stopped event");
            }
        }
        Ok(model)
    }

    /// The running session for a ticket/technician pair, if any.
    #[instrument(skip(self))]
    pub async fn get_active_timer(
        &self,
        ticket_id: Uuid,
        technician_name: &str,
    ) -> Result<Option<time_log::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(time_log::Entity::find()
            .filter(time_log::Column::TicketId.eq(ticket_id))
            .filter(time_log::Column::TechnicianName.eq(technician_name))
            .filter(time_log::Column::EndTime.is_null())
            .one(db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn list_for_ticket(
        &self,
        ticket_id: Uuid,
    ) -> Result<Vec<time_log::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(time_log::Entity::find()
            .filter(time_log::Column::TicketId.eq(ticket_id))
            .order_by_asc(time_log::Column::StartTime)
            .all(db)
            .await?)
    }
}
