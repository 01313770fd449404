use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    billing::BillingService, clients::ClientService, dashboard::DashboardService,
    devices::DeviceService, parts_orders::PartsOrderService, reminders::ReminderService,
    repair_notes::RepairNoteService, tickets::TicketService, time_tracking::TimeTrackingService,
};
use rust_decimal::Decimal;
use std::sync::Arc;

pub mod billing;
pub mod clients;
pub mod common;
pub mod dashboard;
pub mod devices;
pub mod parts_orders;
pub mod reminders;
pub mod repair_notes;
pub mod tickets;
pub mod time_logs;

/// Service container shared by all HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub tickets: Arc<TicketService>,
    pub clients: Arc<ClientService>,
    pub devices: Arc<DeviceService>,
    pub parts_orders: Arc<PartsOrderService>,
    pub repair_notes: Arc<RepairNoteService>,
    pub reminders: Arc<ReminderService>,
    pub time_tracking: Arc<TimeTrackingService>,
    pub billing: Arc<BillingService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        default_tax_rate: Decimal,
    ) -> Self {
        Self {
            tickets: Arc::new(TicketService::new(
                db_pool.clone(),
                Some(event_sender.clone()),
            )),
            clients: Arc::new(ClientService::new(
                db_pool.clone(),
                Some(event_sender.clone()),
            )),
            devices: Arc::new(DeviceService::new(db_pool.clone())),
            parts_orders: Arc::new(PartsOrderService::new(
                db_pool.clone(),
                Some(event_sender.clone()),
            )),
            repair_notes: Arc::new(RepairNoteService::new(db_pool.clone())),
            reminders: Arc::new(ReminderService::new(db_pool.clone())),
            time_tracking: Arc::new(TimeTrackingService::new(
                db_pool.clone(),
                Some(event_sender.clone()),
            )),
            billing: Arc::new(BillingService::new(
                db_pool.clone(),
                Some(event_sender),
                default_tax_rate,
            )),
            dashboard: Arc::new(DashboardService::new(db_pool)),
        }
    }
}
