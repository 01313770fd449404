pub mod activity_log;
pub mod attachment;
pub mod billable_item;
pub mod client;
pub mod device;
pub mod invoice;
pub mod parts_order;
pub mod reminder;
pub mod repair_note;
pub mod sale_item;
pub mod sales_transaction;
pub mod ticket;
pub mod time_log;
