use crate::{
    db::DbPool,
    entities::{client, device},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateDeviceRequest {
    pub client_id: Uuid,
    #[validate(length(min = 1, message = "Device type is required"))]
    pub device_type: String,
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateDeviceRequest {
    pub device_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct DeviceService {
    db_pool: Arc<DbPool>,
}

impl DeviceService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a device for an existing client.
    #[instrument(skip(self, request), fields(client_id = %request.client_id))]
    pub async fn create_device(
        &self,
        request: CreateDeviceRequest,
    ) -> Result<device::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;

        let owner = client::Entity::find_by_id(request.client_id).one(db).await?;
        if owner.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Client {} not found",
                request.client_id
            )));
        }

        let model = device::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(request.client_id),
            device_type: Set(request.device_type),
            brand: Set(request.brand),
            model: Set(request.model),
            serial_number: Set(request.serial_number),
            notes: Set(request.notes),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(device_id = %model.id, "Device registered");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_device(&self, device_id: Uuid) -> Result<Option<device::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(device::Entity::find_by_id(device_id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<device::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(device::Entity::find()
            .filter(device::Column::ClientId.eq(client_id))
            .order_by_asc(device::Column::CreatedAt)
            .all(db)
            .await?)
    }

    #[instrument(skip(self, request))]
    pub async fn update_device(
        &self,
        device_id: Uuid,
        request: UpdateDeviceRequest,
    ) -> Result<device::Model, ServiceError> {
        let db = &*self.db_pool;
        let current = device::Entity::find_by_id(device_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Device {} not found", device_id)))?;

        let mut active: device::ActiveModel = current.into();
        if let Some(device_type) = request.device_type {
            active.device_type = Set(device_type);
        }
        if let Some(brand) = request.brand {
            active.brand = Set(brand);
        }
        if let Some(model) = request.model {
            active.model = Set(model);
        }
        if let Some(serial) = request.serial_number {
            active.serial_number = Set(Some(serial));
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }

        Ok(active.update(db).await?)
    }

    /// Single-row delete. Tickets referencing the device are intentionally
    /// left alone here; only the client cascade removes tickets in bulk.
    #[instrument(skip(self))]
    pub async fn delete_device(&self, device_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let res = device::Entity::delete_by_id(device_id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Device {} not found",
                device_id
            )));
        }
        Ok(())
    }
}
