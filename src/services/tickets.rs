use crate::{
    db::DbPool,
    entities::activity_log,
    entities::parts_order,
    entities::repair_note,
    entities::ticket::{self, TicketPriority, TicketStatus},
    entities::time_log,
    errors::ServiceError,
    events::{Event, EventSender},
    services::ticket_numbers,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// How many times ticket creation retries after a unique-constraint
/// violation on the generated number before giving up.
const INSERT_RETRIES: usize = 3;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTicketRequest {
    pub client_id: Uuid,
    pub device_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub created_by: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub final_cost: Option<Decimal>,
    pub is_paid: Option<bool>,
    pub payment_method: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub performed_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TicketListFilter {
    pub status: Option<String>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub tickets: Vec<ticket::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service owning the ticket lifecycle: creation with generated numbers,
/// status-driven side effects, and the transactional cascade delete.
#[derive(Clone)]
pub struct TicketService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl TicketService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a ticket with a generated `TF-<year>-<seq>` number and
    /// default status `received`, and appends the creation activity entry.
    #[instrument(skip(self, request), fields(client_id = %request.client_id))]
    pub async fn create_ticket(
        &self,
        request: CreateTicketRequest,
    ) -> Result<ticket::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let priority = match request.priority.as_deref() {
            Some(p) => TicketPriority::from_str(p)
                .map_err(|_| ServiceError::InvalidInput(format!("Unknown priority: {}", p)))?,
            None => TicketPriority::Medium,
        };

        let db = &*self.db_pool;

        // The generated number can race with a concurrent creation between
        // the probe and the insert; the unique index catches that, and we
        // retry with a fresh candidate.
        let mut last_err: Option<ServiceError> = None;
        for attempt in 0..INSERT_RETRIES {
            let ticket_number = ticket_numbers::generate_ticket_number(db).await?;
            match self
                .insert_ticket(&request, priority, ticket_number.clone())
                .await
            {
                Ok(model) => {
                    info!(ticket_id = %model.id, ticket_number = %model.ticket_number, "Ticket created");
                    if let Some(sender) = &self.event_sender {
                        if let Err(e) = sender.send(Event::TicketCreated(model.id)).await {
                            warn!(error = %e, "Failed to send ticket created event");
                        }
                    }
                    return Ok(model);
                }
                Err(ServiceError::DatabaseError(db_err))
                    if matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
                {
                    warn!(%ticket_number, attempt, "Ticket number collided on insert, retrying");
                    last_err = Some(ServiceError::DatabaseError(db_err));
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            ServiceError::InternalError("ticket number generation exhausted retries".into())
        }))
    }

    async fn insert_ticket(
        &self,
        request: &CreateTicketRequest,
        priority: TicketPriority,
        ticket_number: String,
    ) -> Result<ticket::Model, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();
        let ticket_id = Uuid::new_v4();

        let txn = db.begin().await?;

        let model = ticket::ActiveModel {
            id: Set(ticket_id),
            ticket_number: Set(ticket_number),
            client_id: Set(request.client_id),
            device_id: Set(request.device_id),
            title: Set(request.title.clone()),
            description: Set(request.description.clone()),
            status: Set(TicketStatus::Received.to_string()),
            priority: Set(priority.to_string()),
            estimated_cost: Set(request.estimated_cost),
            final_cost: Set(None),
            is_paid: Set(false),
            payment_method: Set(None),
            payment_date: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            completed_at: Set(None),
        }
        .insert(&txn)
        .await?;

        append_activity(
            &txn,
            ticket_id,
            "created",
            format!("Ticket {} created", model.ticket_number),
            request.created_by.clone(),
        )
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_ticket(&self, ticket_id: Uuid) -> Result<Option<ticket::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(ticket::Entity::find_by_id(ticket_id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_tickets(
        &self,
        filter: TicketListFilter,
        page: u64,
        per_page: u64,
    ) -> Result<TicketListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = ticket::Entity::find().order_by_desc(ticket::Column::CreatedAt);
        if let Some(status) = &filter.status {
            let parsed = TicketStatus::from_str(status)
                .map_err(|_| ServiceError::InvalidStatus(status.clone()))?;
            query = query.filter(ticket::Column::Status.eq(parsed.to_string()));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(ticket::Column::ClientId.eq(client_id));
        }

        let paginator = query.paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let tickets = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok(TicketListResponse {
            tickets,
            total,
            page,
            per_page,
        })
    }

    /// Applies a partial update. Always re-stamps `updated_at`; a status
    /// change to `completed` stamps `completed_at`, and any status change
    /// appends an activity entry describing the old and new values.
    /// `completed_at` is intentionally never cleared when the status moves
    /// away from `completed` again.
    #[instrument(skip(self, request), fields(ticket_id = %ticket_id))]
    pub async fn update_ticket(
        &self,
        ticket_id: Uuid,
        request: UpdateTicketRequest,
    ) -> Result<ticket::Model, ServiceError> {
        let db = &*self.db_pool;

        let current = ticket::Entity::find_by_id(ticket_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Ticket {} not found", ticket_id)))?;

        let old_status = TicketStatus::from_str(&current.status)
            .map_err(|_| ServiceError::InvalidStatus(current.status.clone()))?;

        let new_status = match request.status.as_deref() {
            Some(s) => {
                let parsed = TicketStatus::from_str(s)
                    .map_err(|_| ServiceError::InvalidStatus(s.to_string()))?;
                if !old_status.can_transition_to(parsed) {
                    return Err(ServiceError::InvalidOperation(format!(
                        "Cannot move ticket from {} to {}",
                        old_status, parsed
                    )));
                }
                Some(parsed)
            }
            None => None,
        };

        let priority = match request.priority.as_deref() {
            Some(p) => Some(
                TicketPriority::from_str(p)
                    .map_err(|_| ServiceError::InvalidInput(format!("Unknown priority: {}", p)))?,
            ),
            None => None,
        };

        let now = Utc::now();
        let txn = db.begin().await?;

        let mut active: ticket::ActiveModel = current.clone().into();
        if let Some(title) = &request.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &request.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(status) = new_status {
            active.status = Set(status.to_string());
            if status == TicketStatus::Completed {
                active.completed_at = Set(Some(now));
            }
        }
        if let Some(priority) = priority {
            active.priority = Set(priority.to_string());
        }
        if let Some(cost) = request.estimated_cost {
            active.estimated_cost = Set(Some(cost));
        }
        if let Some(cost) = request.final_cost {
            active.final_cost = Set(Some(cost));
        }
        if let Some(is_paid) = request.is_paid {
            active.is_paid = Set(is_paid);
        }
        if let Some(method) = &request.payment_method {
            active.payment_method = Set(Some(method.clone()));
        }
        if let Some(date) = request.payment_date {
            active.payment_date = Set(Some(date));
        }
        active.updated_at = Set(Some(now));

        let updated = active.update(&txn).await?;

        let status_changed = new_status.filter(|s| *s != old_status);
        if let Some(status) = status_changed {
            append_activity(
                &txn,
                ticket_id,
                "status_change",
                format!("Status changed from {} to {}", old_status, status),
                request.performed_by.clone(),
            )
            .await?;
        }

        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            let event = match status_changed {
                Some(status) => Event::TicketStatusChanged {
                    ticket_id,
                    old_status: old_status.to_string(),
                    new_status: status.to_string(),
                },
                None => Event::TicketUpdated(ticket_id),
            };
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send ticket update event");
            }
        }

        Ok(updated)
    }

    /// Deletes a ticket and every dependent row (time logs, repair notes,
    /// parts orders, activity logs) as one transaction.
    #[instrument(skip(self))]
    pub async fn delete_ticket(&self, ticket_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = ticket::Entity::find_by_id(ticket_id).one(db).await?;
        if existing.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Ticket {} not found",
                ticket_id
            )));
        }

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start ticket delete transaction");
            ServiceError::DatabaseError(e)
        })?;

        // Children before the parent row.
        time_log::Entity::delete_many()
            .filter(time_log::Column::TicketId.eq(ticket_id))
            .exec(&txn)
            .await?;
        repair_note::Entity::delete_many()
            .filter(repair_note::Column::TicketId.eq(ticket_id))
            .exec(&txn)
            .await?;
        parts_order::Entity::delete_many()
            .filter(parts_order::Column::TicketId.eq(ticket_id))
            .exec(&txn)
            .await?;
        activity_log::Entity::delete_many()
            .filter(activity_log::Column::TicketId.eq(ticket_id))
            .exec(&txn)
            .await?;
        ticket::Entity::delete_by_id(ticket_id).exec(&txn).await?;

        txn.commit().await?;

        info!(%ticket_id, "Ticket and dependents deleted");
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::TicketDeleted(ticket_id)).await {
                warn!(error = %e, "Failed to send ticket deleted event");
            }
        }
        Ok(())
    }

    /// Activity trail for a ticket, oldest first.
    #[instrument(skip(self))]
    pub async fn list_activity(
        &self,
        ticket_id: Uuid,
    ) -> Result<Vec<activity_log::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(activity_log::Entity::find()
            .filter(activity_log::Column::TicketId.eq(ticket_id))
            .order_by_asc(activity_log::Column::CreatedAt)
            .all(db)
            .await?)
    }
}

/// Appends an audit entry on a ticket. Shared by every side-effecting
/// operation (status changes, note additions, parts orders).
pub(crate) async fn append_activity<C: ConnectionTrait>(
    db: &C,
    ticket_id: Uuid,
    activity_type: &str,
    description: String,
    performed_by: Option<String>,
) -> Result<activity_log::Model, ServiceError> {
    let entry = activity_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        ticket_id: Set(ticket_id),
        activity_type: Set(activity_type.to_string()),
        description: Set(description),
        details: Set(None),
        performed_by: Set(performed_by),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(entry)
}
