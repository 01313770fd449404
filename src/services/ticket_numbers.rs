//! Human-readable sequential numbers for tickets and invoices.
//!
//! Numbers take the form `<prefix>-<year>-<NNN>`. The generator counts
//! existing rows for the current year, proposes `count + 1 + attempts`,
//! and probes for an exact-match collision before handing the candidate
//! out. The probe loop is only an optimization: the unique index on the
//! number column plus retry-on-conflict at insert time is what actually
//! guarantees uniqueness under concurrent creation.

use crate::entities::{invoice, ticket};
use crate::errors::ServiceError;
use chrono::{Datelike, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::warn;

pub const TICKET_PREFIX: &str = "TF";
pub const INVOICE_PREFIX: &str = "INV";

const MAX_ATTEMPTS: u64 = 10;

/// `TF-2026-007` style numbers, zero-padded to three digits.
pub fn format_number(prefix: &str, year: i32, seq: u64) -> String {
    format!("{}-{}-{:03}", prefix, year, seq)
}

/// Timestamp-derived fallback used when the probe loop exhausts its
/// attempts: last six digits of the epoch milliseconds.
pub fn fallback_number(prefix: &str, year: i32, epoch_millis: i64) -> String {
    format!("{}-{}-{:06}", prefix, year, epoch_millis.rem_euclid(1_000_000))
}

/// Generates the next ticket number for the current year.
pub async fn generate_ticket_number<C: ConnectionTrait>(db: &C) -> Result<String, ServiceError> {
    let year = Utc::now().year();
    let pattern = format!("{}-{}-%", TICKET_PREFIX, year);

    let count = ticket::Entity::find()
        .filter(ticket::Column::TicketNumber.like(&pattern))
        .count(db)
        .await?;

    for attempts in 0..MAX_ATTEMPTS {
        let candidate = format_number(TICKET_PREFIX, year, count + 1 + attempts);
        let exists = ticket::Entity::find()
            .filter(ticket::Column::TicketNumber.eq(candidate.as_str()))
            .count(db)
            .await?;
        if exists == 0 {
            return Ok(candidate);
        }
    }

    warn!(year, "ticket number probe exhausted, falling back to timestamp suffix");
    Ok(fallback_number(
        TICKET_PREFIX,
        year,
        Utc::now().timestamp_millis(),
    ))
}

/// Generates the next invoice number for the current year. Same algorithm
/// as ticket numbers, scoped to the invoices table.
pub async fn generate_invoice_number<C: ConnectionTrait>(db: &C) -> Result<String, ServiceError> {
    let year = Utc::now().year();
    let pattern = format!("{}-{}-%", INVOICE_PREFIX, year);

    let count = invoice::Entity::find()
        .filter(invoice::Column::InvoiceNumber.like(&pattern))
        .count(db)
        .await?;

    for attempts in 0..MAX_ATTEMPTS {
        let candidate = format_number(INVOICE_PREFIX, year, count + 1 + attempts);
        let exists = invoice::Entity::find()
            .filter(invoice::Column::InvoiceNumber.eq(candidate.as_str()))
            .count(db)
            .await?;
        if exists == 0 {
            return Ok(candidate);
        }
    }

    warn!(year, "invoice number probe exhausted, falling back to timestamp suffix");
    Ok(fallback_number(
        INVOICE_PREFIX,
        year,
        Utc::now().timestamp_millis(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_number("TF", 2026, 1), "TF-2026-001");
        assert_eq!(format_number("TF", 2026, 42), "TF-2026-042");
        assert_eq!(format_number("TF", 2026, 100), "TF-2026-100");
    }

    #[test]
    fn sequence_past_three_digits_is_not_truncated() {
        assert_eq!(format_number("TF", 2026, 1234), "TF-2026-1234");
    }

    #[test]
    fn fallback_uses_last_six_digits_of_epoch_millis() {
        assert_eq!(fallback_number("TF", 2026, 1_767_225_599_123), "TF-2026-599123");
        assert_eq!(fallback_number("INV", 2026, 1_000_000), "INV-2026-000000");
    }
}
