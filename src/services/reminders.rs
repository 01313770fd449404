use crate::{
    db::DbPool,
    entities::reminder,
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReminderRequest {
    pub ticket_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReminderListFilter {
    /// When true, completed reminders are included in the listing.
    #[serde(default)]
    pub include_completed: bool,
}

#[derive(Clone)]
pub struct ReminderService {
    db_pool: Arc<DbPool>,
}

impl ReminderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request))]
    pub async fn create_reminder(
        &self,
        request: CreateReminderRequest,
    ) -> Result<reminder::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let model = reminder::ActiveModel {
            id: Set(Uuid::new_v4()),
            ticket_id: Set(request.ticket_id),
            client_id: Set(request.client_id),
            title: Set(request.title),
            description: Set(request.description),
            due_date: Set(request.due_date),
            is_completed: Set(false),
            completed_at: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn list_reminders(
        &self,
        filter: ReminderListFilter,
    ) -> Result<Vec<reminder::Model>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = reminder::Entity::find().order_by_asc(reminder::Column::DueDate);
        if !filter.include_completed {
            query = query.filter(reminder::Column::IsCompleted.eq(false));
        }
        Ok(query.all(db).await?)
    }

    /// Marks a reminder done and stamps its completion time.
    #[instrument(skip(self))]
    pub async fn complete_reminder(
        &self,
        reminder_id: Uuid,
    ) -> Result<reminder::Model, ServiceError> {
        let db = &*self.db_pool;
        let current = reminder::Entity::find_by_id(reminder_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Reminder {} not found", reminder_id)))?;

        if current.is_completed {
            return Err(ServiceError::InvalidOperation(
                "Reminder is already completed".into(),
            ));
        }

        let mut active: reminder::ActiveModel = current.into();
        active.is_completed = Set(true);
        active.completed_at = Set(Some(Utc::now()));
        Ok(active.update(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_reminder(&self, reminder_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let res = reminder::Entity::delete_by_id(reminder_id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Reminder {} not found",
                reminder_id
            )));
        }
        Ok(())
    }
}
