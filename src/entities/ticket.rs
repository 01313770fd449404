use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter as StrumEnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

/// The central work-order entity tying a client, a device, and a repair
/// workflow together.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-readable number in the form `TF-<year>-<seq>`, unique across
    /// all tickets.
    #[validate(length(min = 1, max = 50))]
    pub ticket_number: String,

    pub client_id: Uuid,
    pub device_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub description: Option<String>,

    pub status: String,
    pub priority: String,

    pub estimated_cost: Option<Decimal>,
    pub final_cost: Option<Decimal>,
    pub is_paid: bool,
    pub payment_method: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Stamped when status first becomes `completed`; never auto-cleared on
    /// a later status change.
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::device::Entity",
        from = "Column::DeviceId",
        to = "super::device::Column::Id"
    )]
    Device,
    #[sea_orm(has_many = "super::parts_order::Entity")]
    PartsOrders,
    #[sea_orm(has_many = "super::activity_log::Entity")]
    ActivityLogs,
    #[sea_orm(has_many = "super::repair_note::Entity")]
    RepairNotes,
    #[sea_orm(has_many = "super::time_log::Entity")]
    TimeLogs,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl Related<super::parts_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartsOrders.def()
    }
}

impl Related<super::activity_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityLogs.def()
    }
}

impl Related<super::repair_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RepairNotes.def()
    }
}

impl Related<super::time_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Repair workflow states, stored as strings in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, StrumEnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Received,
    Diagnosed,
    AwaitingParts,
    InProgress,
    ReadyForPickup,
    Completed,
}

impl TicketStatus {
    /// Explicit transition lookup. Currently every transition is allowed;
    /// keeping the table makes future workflow constraints additive.
    pub fn can_transition_to(self, _next: TicketStatus) -> bool {
        match self {
            TicketStatus::Received
            | TicketStatus::Diagnosed
            | TicketStatus::AwaitingParts
            | TicketStatus::InProgress
            | TicketStatus::ReadyForPickup
            | TicketStatus::Completed => true,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, StrumEnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}
