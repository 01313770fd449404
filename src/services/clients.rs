use crate::{
    db::DbPool,
    entities::{
        activity_log, attachment, client, device, parts_order, repair_note, ticket, time_log,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClientListResponse {
    pub clients: Vec<client::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Clone)]
pub struct ClientService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ClientService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_client(
        &self,
        request: CreateClientRequest,
    ) -> Result<client::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let model = client::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            email: Set(request.email),
            phone: Set(request.phone),
            address: Set(request.address),
            notes: Set(request.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?;

        info!(client_id = %model.id, "Client created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_client(&self, client_id: Uuid) -> Result<Option<client::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(client::Entity::find_by_id(client_id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_clients(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<ClientListResponse, ServiceError> {
        let db = &*self.db_pool;
        let paginator = client::Entity::find()
            .order_by_asc(client::Column::Name)
            .paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let clients = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok(ClientListResponse {
            clients,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_client(
        &self,
        client_id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<client::Model, ServiceError> {
        let db = &*self.db_pool;
        let current = client::Entity::find_by_id(client_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Client {} not found", client_id)))?;

        let mut active: client::ActiveModel = current.into();
        if let Some(name) = request.name {
            if name.is_empty() {
                return Err(ServiceError::ValidationError("Name cannot be empty".into()));
            }
            active.name = Set(name);
        }
        if let Some(email) = request.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Some(Utc::now()));

        Ok(active.update(db).await?)
    }

    /// Deletes a client and everything hanging off it: devices, the tickets
    /// referencing those devices, and each such ticket's time logs,
    /// attachments, repair notes, parts orders, and activity logs. Runs as
    /// one transaction so a mid-sequence failure cannot leave orphans.
    #[instrument(skip(self))]
    pub async fn delete_client(&self, client_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = client::Entity::find_by_id(client_id).one(db).await?;
        if existing.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Client {} not found",
                client_id
            )));
        }

        let txn = db.begin().await?;

        let device_ids: Vec<Uuid> = device::Entity::find()
            .filter(device::Column::ClientId.eq(client_id))
            .select_only()
            .column(device::Column::Id)
            .into_tuple()
            .all(&txn)
            .await?;

        let ticket_ids: Vec<Uuid> = if device_ids.is_empty() {
            Vec::new()
        } else {
            ticket::Entity::find()
                .filter(ticket::Column::DeviceId.is_in(device_ids.clone()))
                .select_only()
                .column(ticket::Column::Id)
                .into_tuple()
                .all(&txn)
                .await?
        };

        let tickets_removed = ticket_ids.len() as u64;

        if !ticket_ids.is_empty() {
            time_log::Entity::delete_many()
                .filter(time_log::Column::TicketId.is_in(ticket_ids.clone()))
                .exec(&txn)
                .await?;
            attachment::Entity::delete_many()
                .filter(attachment::Column::TicketId.is_in(ticket_ids.clone()))
                .exec(&txn)
                .await?;
            repair_note::Entity::delete_many()
                .filter(repair_note::Column::TicketId.is_in(ticket_ids.clone()))
                .exec(&txn)
                .await?;
            parts_order::Entity::delete_many()
                .filter(parts_order::Column::TicketId.is_in(ticket_ids.clone()))
                .exec(&txn)
                .await?;
            activity_log::Entity::delete_many()
                .filter(activity_log::Column::TicketId.is_in(ticket_ids.clone()))
                .exec(&txn)
                .await?;
            ticket::Entity::delete_many()
                .filter(ticket::Column::Id.is_in(ticket_ids))
                .exec(&txn)
                .await?;
        }

        device::Entity::delete_many()
            .filter(device::Column::ClientId.eq(client_id))
            .exec(&txn)
            .await?;
        client::Entity::delete_by_id(client_id).exec(&txn).await?;

        txn.commit().await?;

        info!(%client_id, tickets_removed, "Client cascade delete completed");
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender
                .send(Event::ClientDeleted {
                    client_id,
                    tickets_removed,
                })
                .await
            {
                warn!(error = %e, "Failed to send client deleted event");
            }
        }
        Ok(())
    }
}
