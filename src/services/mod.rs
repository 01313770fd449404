pub mod billing;
pub mod clients;
pub mod dashboard;
pub mod devices;
pub mod parts_orders;
pub mod reminders;
pub mod repair_notes;
pub mod ticket_numbers;
pub mod tickets;
pub mod time_tracking;
