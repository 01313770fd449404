use crate::{
    db::DbPool,
    entities::parts_order::{self, PartsOrderStatus},
    entities::ticket,
    errors::ServiceError,
    events::{Event, EventSender},
    services::tickets::append_activity,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePartsOrderRequest {
    pub ticket_id: Uuid,
    #[validate(length(min = 1, message = "Part name is required"))]
    pub part_name: String,
    pub supplier: Option<String>,
    pub cost: Decimal,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub expected_date: Option<DateTime<Utc>>,
    pub ordered_by: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdatePartsOrderRequest {
    pub part_name: Option<String>,
    pub supplier: Option<String>,
    pub cost: Option<Decimal>,
    pub quantity: Option<i32>,
    pub status: Option<String>,
    pub expected_date: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct PartsOrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl PartsOrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a parts order in status `ordered` and appends the matching
    /// activity entry on the owning ticket.
    #[instrument(skip(self, request), fields(ticket_id = %request.ticket_id))]
    pub async fn create_parts_order(
        &self,
        request: CreatePartsOrderRequest,
    ) -> Result<parts_order::Model, ServiceError> {
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

        let model = parts_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            ticket_id: Set(request.ticket_id),
            part_name: Set(request.part_name.clone()),
            supplier: Set(request.supplier),
            cost: Set(request.cost),
            quantity: Set(request.quantity),
            status: Set(PartsOrderStatus::Ordered.to_string()),
            order_date: Set(Utc::now()),
            expected_date: Set(request.expected_date),
            received_date: Set(None),
        }
        .insert(&txn)
        .await?;

        append_activity(
            &txn,
            request.ticket_id,
            "part_ordered",
            format!("Part ordered: {} x{}", request.part_name, request.quantity),
            request.ordered_by,
        )
        .await?;

        txn.commit().await?;

        info!(parts_order_id = %model.id, "Parts order created");
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::PartsOrderCreated(model.id)).await {
                warn!(error = %e, "Failed to send parts order created event");
            }
        }
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_parts_order(
        &self,
        id: Uuid,
    ) -> Result<Option<parts_order::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(parts_order::Entity::find_by_id(id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_for_ticket(
        &self,
        ticket_id: Uuid,
    ) -> Result<Vec<parts_order::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(parts_order::Entity::find()
            .filter(parts_order::Column::TicketId.eq(ticket_id))
            .order_by_asc(parts_order::Column::OrderDate)
            .all(db)
            .await?)
    }

    /// Applies a partial update. `received_date` is stamped exactly when
    /// the status transitions to `delivered`.
    #[instrument(skip(self, request))]
    pub async fn update_parts_order(
        &self,
        id: Uuid,
        request: UpdatePartsOrderRequest,
    ) -> Result<parts_order::Model, ServiceError> {
        let db = &*self.db_pool;
        let current = parts_order::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Parts order {} not found", id)))?;

        let new_status = match request.status.as_deref() {
            Some(s) => Some(
                PartsOrderStatus::from_str(s)
                    .map_err(|_| ServiceError::InvalidStatus(s.to_string()))?,
            ),
            None => None,
        };
        let was_delivered = current.status == PartsOrderStatus::Delivered.to_string();

        let mut active: parts_order::ActiveModel = current.into();
        if let Some(part_name) = request.part_name {
            active.part_name = Set(part_name);
        }
        if let Some(supplier) = request.supplier {
            active.supplier = Set(Some(supplier));
        }
        if let Some(cost) = request.cost {
            active.cost = Set(cost);
        }
        if let Some(quantity) = request.quantity {
            if quantity < 1 {
                return Err(ServiceError::ValidationError(
                    "Quantity must be at least 1".into(),
                ));
            }
            active.quantity = Set(quantity);
        }
        if let Some(expected) = request.expected_date {
            active.expected_date = Set(Some(expected));
        }

        let mut delivered_now = false;
        if let Some(status) = new_status {
            active.status = Set(status.to_string());
            if status == PartsOrderStatus::Delivered && !was_delivered {
                active.received_date = Set(Some(Utc::now()));
                delivered_now = true;
            }
        }

        let updated = active.update(db).await?;

        if delivered_now {
            if let Some(sender) = &self.event_sender {
                if let Err(e) = sender.send(Event::PartsOrderDelivered(updated.id)).await {
                    warn!(error = %e, "Failed to send parts delivered event");
                }
            }
        }

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_parts_order(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let res = parts_order::Entity::delete_by_id(id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Parts order {} not found", id)));
        }
        Ok(())
    }
}
