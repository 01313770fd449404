use crate::{
    db::DbPool,
    entities::repair_note::{self, RepairNoteType},
    entities::ticket::{self, TicketPriority},
    errors::ServiceError,
    services::tickets::append_activity,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateRepairNoteRequest {
    pub ticket_id: Uuid,
    #[validate(length(min = 1, message = "Author is required"))]
    pub created_by: String,
    pub note_type: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub tags: Option<Vec<String>>,
}

#[derive(Clone)]
pub struct RepairNoteService {
    db_pool: Arc<DbPool>,
}

impl RepairNoteService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Adds a typed note and appends the matching activity entry on the
    /// owning ticket, in one transaction.
    #[instrument(skip(self, request), fields(ticket_id = %request.ticket_id))]
    pub async fn create_note(
        &self,
        request: CreateRepairNoteRequest,
    ) -> Result<repair_note::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let note_type = RepairNoteType::from_str(&request.note_type)
            .map_err(|_| ServiceError::InvalidInput(format!("Unknown note type: {}", request.note_type)))?;
        let priority = match request.priority.as_deref() {
            Some(p) => TicketPriority::from_str(p)
                .map_err(|_| ServiceError::InvalidInput(format!("Unknown priority: {}", p)))?,
            None => TicketPriority::Medium,
        };
        let tags = match &request.tags {
            Some(tags) => Some(
                serde_json::to_string(tags)
                    .map_err(|e| ServiceError::InternalError(e.to_string()))?,
            ),
            None => None,
        };

        let db = &*self.db_pool;
        let owner = ticket::Entity::find_by_id(request.ticket_id).one(db).await?;
        if owner.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Ticket {} not found",
                request.ticket_id
            )));
        }

        let txn = db.begin().await?;

        let model = repair_note::ActiveModel {
            id: Set(Uuid::new_v4()),
            ticket_id: Set(request.ticket_id),
            created_by: Set(request.created_by.clone()),
            note_type: Set(note_type.to_string()),
            priority: Set(priority.to_string()),
            content: Set(request.content),
            resolved: Set(false),
            tags: Set(tags),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        append_activity(
            &txn,
            request.ticket_id,
            "note_added",
            format!("Repair note added ({})", note_type),
            Some(request.created_by),
        )
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn list_for_ticket(
        &self,
        ticket_id: Uuid,
    ) -> Result<Vec<repair_note::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(repair_note::Entity::find()
            .filter(repair_note::Column::TicketId.eq(ticket_id))
            .order_by_desc(repair_note::Column::CreatedAt)
            .all(db)
            .await?)
    }

    /// Flips the resolved flag.
    #[instrument(skip(self))]
    pub async fn set_resolved(
        &self,
        note_id: Uuid,
        resolved: bool,
    ) -> Result<repair_note::Model, ServiceError> {
        let db = &*self.db_pool;
        let current = repair_note::Entity::find_by_id(note_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Repair note {} not found", note_id)))?;

        let mut active: repair_note::ActiveModel = current.into();
        active.resolved = Set(resolved);
        Ok(active.update(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_note(&self, note_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let res = repair_note::Entity::delete_by_id(note_id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Repair note {} not found",
                note_id
            )));
        }
        Ok(())
    }
}
