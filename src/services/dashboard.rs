use crate::{
    db::DbPool,
    entities::parts_order::{self, PartsOrderStatus},
    entities::ticket::{self, TicketStatus},
    errors::ServiceError,
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Summary counters shown on the shop dashboard. Every field is an
/// independent aggregate query, re-run on each call.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStats {
    pub active_tickets: u64,
    pub pending_parts: u64,
    pub ready_for_pickup: u64,
    pub revenue: Decimal,
    pub completed_today: u64,
    pub new_today: u64,
    pub parts_received_today: u64,
    pub revenue_today: Decimal,
    pub generated_at: DateTime<Utc>,
}

/// The current calendar day in the server's local timezone, as a
/// half-open `[start, start + 24h)` window in UTC.
pub fn local_day_window() -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Local::now().date_naive();
    let midnight = today.and_hms_opt(0, 0, 0).unwrap_or_default();
    let start = match Local.from_local_datetime(&midnight) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => dt,
        // Midnight skipped by a DST jump; fall back to the UTC reading.
        chrono::LocalResult::None => {
            return {
                let start = Utc::now()
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .unwrap_or_default()
                    .and_utc();
                (start, start + Duration::hours(24))
            }
        }
    }
    .with_timezone(&Utc);
    (start, start + Duration::hours(24))
}

#[derive(Clone)]
pub struct DashboardService {
    db_pool: Arc<DbPool>,
}

impl DashboardService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db_pool;
        let (day_start, day_end) = local_day_window();

        let active_tickets = ticket::Entity::find()
            .filter(ticket::Column::Status.ne(TicketStatus::Completed.to_string()))
            .count(db)
            .await?;

        let pending_parts = parts_order::Entity::find()
            .filter(
                parts_order::Column::Status.is_in([
                    PartsOrderStatus::Ordered.to_string(),
                    PartsOrderStatus::InTransit.to_string(),
                ]),
            )
            .count(db)
            .await?;

        let ready_for_pickup = ticket::Entity::find()
            .filter(ticket::Column::Status.eq(TicketStatus::ReadyForPickup.to_string()))
            .count(db)
            .await?;

        let revenue = Self::sum_final_cost(
            ticket::Entity::find()
                .filter(ticket::Column::IsPaid.eq(true))
                .all(db)
                .await?,
        );

        let completed_today = ticket::Entity::find()
            .filter(ticket::Column::CompletedAt.gte(day_start))
            .filter(ticket::Column::CompletedAt.lt(day_end))
            .count(db)
            .await?;

        let new_today = ticket::Entity::find()
            .filter(ticket::Column::CreatedAt.gte(day_start))
            .filter(ticket::Column::CreatedAt.lt(day_end))
            .count(db)
            .await?;

        let parts_received_today = parts_order::Entity::find()
            .filter(parts_order::Column::ReceivedDate.gte(day_start))
            .filter(parts_order::Column::ReceivedDate.lt(day_end))
            .count(db)
            .await?;

        let revenue_today = Self::sum_final_cost(
            ticket::Entity::find()
                .filter(ticket::Column::IsPaid.eq(true))
                .filter(ticket::Column::PaymentDate.gte(day_start))
                .filter(ticket::Column::PaymentDate.lt(day_end))
                .all(db)
                .await?,
        );

        Ok(DashboardStats {
            active_tickets,
            pending_parts,
            ready_for_pickup,
            revenue,
            completed_today,
            new_today,
            parts_received_today,
            revenue_today,
            generated_at: Utc::now(),
        })
    }

    /// Folds `final_cost` in Decimal to keep money math exact; tickets
    /// without a final cost contribute nothing.
    fn sum_final_cost(tickets: Vec<ticket::Model>) -> Decimal {
        tickets
            .into_iter()
            .filter_map(|t| t.final_cost)
            .sum::<Decimal>()
            .round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_window_spans_exactly_24_hours() {
        let (start, end) = local_day_window();
        assert_eq!(end - start, Duration::hours(24));
    }

    #[test]
    fn day_window_contains_now() {
        let (start, end) = local_day_window();
        let now = Utc::now();
        assert!(start <= now && now < end);
    }
}
