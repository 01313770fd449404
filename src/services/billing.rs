use crate::{
    db::DbPool,
    entities::billable_item::{self, BillableItemKind},
    entities::invoice,
    entities::sale_item,
    entities::sales_transaction,
    entities::ticket,
    errors::ServiceError,
    events::{Event, EventSender},
    services::ticket_numbers,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Tax-separated totals for a set of chargeable lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// One line's pre-tax and tax components.
///
/// Tax-inclusive lines carry tax inside `line_total`, so the pre-tax base
/// is backed out by dividing by `1 + rate/100`; tax-exclusive lines add tax
/// on top of `unit_price * quantity`. A rate of -100% would mean dividing
/// by zero and is rejected.
pub fn line_amounts(
    unit_price: Decimal,
    quantity: Decimal,
    line_total: Decimal,
    tax_rate: Decimal,
    tax_inclusive: bool,
) -> Result<(Decimal, Decimal), ServiceError> {
    let rate_factor = Decimal::ONE + tax_rate / Decimal::ONE_HUNDRED;
    if tax_inclusive {
        if rate_factor.is_zero() {
            return Err(ServiceError::ValidationError(
                "A tax rate of -100% is not allowed".into(),
            ));
        }
        let base = line_total / rate_factor;
        Ok((base, line_total - base))
    } else {
        let pre_tax = unit_price * quantity;
        Ok((pre_tax, pre_tax * tax_rate / Decimal::ONE_HUNDRED))
    }
}

/// Sums pre-tax and tax components across items and rounds each side to
/// cents, so `subtotal + tax_amount == total` holds exactly.
pub fn calculate_totals(items: &[billable_item::Model]) -> Result<Totals, ServiceError> {
    let mut subtotal = Decimal::ZERO;
    let mut tax_amount = Decimal::ZERO;

    for item in items {
        let (pre_tax, tax) = line_amounts(
            item.unit_price,
            item.quantity,
            item.line_total,
            item.tax_rate,
            item.tax_inclusive,
        )?;
        subtotal += pre_tax;
        tax_amount += tax;
    }

    let subtotal = subtotal.round_dp(2);
    let tax_amount = tax_amount.round_dp(2);
    Ok(Totals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    })
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateBillableItemRequest {
    pub ticket_id: Uuid,
    pub kind: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Defaults to `unit_price * quantity` when not supplied; required
    /// meaningfully only for tax-inclusive lines.
    pub line_total: Option<Decimal>,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub tax_inclusive: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SaleItemInput {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub tax_inclusive: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateSaleRequest {
    #[validate]
    pub items: Vec<SaleItemInput>,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
    pub created_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub transaction: sales_transaction::Model,
    pub items: Vec<sale_item::Model>,
}

/// Billing side of the shop: chargeable items per ticket, invoice
/// generation, and ticket-independent point-of-sale checkouts.
#[derive(Clone)]
pub struct BillingService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    /// Applied when a billable item does not carry its own rate.
    default_tax_rate: Decimal,
}

impl BillingService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        default_tax_rate: Decimal,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            default_tax_rate,
        }
    }

    #[instrument(skip(self, request), fields(ticket_id = %request.ticket_id))]
    pub async fn create_billable_item(
        &self,
        request: CreateBillableItemRequest,
    ) -> Result<billable_item::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        let kind = BillableItemKind::from_str(&request.kind)
            .map_err(|_| ServiceError::InvalidInput(format!("Unknown item kind: {}", request.kind)))?;
        if request.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Quantity must be positive".into(),
            ));
        }

        let tax_rate = request.tax_rate.unwrap_or(self.default_tax_rate);
        let line_total = request
            .line_total
            .unwrap_or(request.unit_price * request.quantity);

        // Surface a bad rate at creation instead of at invoice time.
        line_amounts(
            request.unit_price,
            request.quantity,
            line_total,
            tax_rate,
            request.tax_inclusive,
        )?;

        let db = &*self.db_pool;
        let owner = ticket::Entity::find_by_id(request.ticket_id).one(db).await?;
        if owner.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Ticket {} not found",
                request.ticket_id
            )));
        }

        let model = billable_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            ticket_id: Set(request.ticket_id),
            invoice_id: Set(None),
            kind: Set(kind.to_string()),
            description: Set(request.description),
            quantity: Set(request.quantity),
            unit_price: Set(request.unit_price),
            line_total: Set(line_total),
            tax_rate: Set(tax_rate),
            tax_inclusive: Set(request.tax_inclusive),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        Ok(model)
    }

    /// Items not yet associated with an invoice, optionally scoped to one
    /// ticket.
    #[instrument(skip(self))]
    pub async fn get_unbilled_items(
        &self,
        ticket_id: Option<Uuid>,
    ) -> Result<Vec<billable_item::Model>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = billable_item::Entity::find()
            .filter(billable_item::Column::InvoiceId.is_null())
            .order_by_asc(billable_item::Column::CreatedAt);
        if let Some(ticket_id) = ticket_id {
            query = query.filter(billable_item::Column::TicketId.eq(ticket_id));
        }
        Ok(query.all(db).await?)
    }

    /// Associates a batch of items with an invoice in a single bulk update.
    /// Generic over the connection so invoice generation can run it inside
    /// its transaction.
    #[instrument(skip(self, db, item_ids))]
    pub async fn mark_items_billed<C: ConnectionTrait>(
        &self,
        db: &C,
        item_ids: &[Uuid],
        invoice_id: Uuid,
    ) -> Result<u64, ServiceError> {
        if item_ids.is_empty() {
            return Ok(0);
        }
        let res = billable_item::Entity::update_many()
            .col_expr(
                billable_item::Column::InvoiceId,
                sea_orm::sea_query::Expr::value(invoice_id),
            )
            .filter(billable_item::Column::Id.is_in(item_ids.to_vec()))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Collects a ticket's unbilled items, computes totals, creates the
    /// invoice, and marks the items billed against it, all in one
    /// transaction. Fails when there is nothing to bill.
    #[instrument(skip(self))]
    pub async fn generate_invoice_for_ticket(
        &self,
        ticket_id: Uuid,
    ) -> Result<invoice::Model, ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await?;

        let items = billable_item::Entity::find()
            .filter(billable_item::Column::TicketId.eq(ticket_id))
            .filter(billable_item::Column::InvoiceId.is_null())
            .all(&txn)
            .await?;
        if items.is_empty() {
            return Err(ServiceError::InvalidOperation(format!(
                "Ticket {} has no unbilled items",
                ticket_id
            )));
        }

        let totals = calculate_totals(&items)?;
        let invoice_number = ticket_numbers::generate_invoice_number(&txn).await?;
        let now = Utc::now();
        let invoice_id = Uuid::new_v4();

        let model = invoice::ActiveModel {
            id: Set(invoice_id),
            invoice_number: Set(invoice_number),
            ticket_id: Set(ticket_id),
            subtotal: Set(totals.subtotal),
            tax_amount: Set(totals.tax_amount),
            total: Set(totals.total),
            issued_at: Set(now),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        self.mark_items_billed(&txn, &item_ids, invoice_id).await?;

        txn.commit().await?;

        info!(%invoice_id, %ticket_id, total = %model.total, "Invoice generated");
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender
                .send(Event::InvoiceGenerated {
                    invoice_id,
                    ticket_id,
                    total: model.total,
                })
                .await
            {
                warn!(error = %e, "Failed to send invoice generated event");
            }
        }
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<invoice::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(invoice::Entity::find_by_id(invoice_id).one(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_invoices_for_ticket(
        &self,
        ticket_id: Uuid,
    ) -> Result<Vec<invoice::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(invoice::Entity::find()
            .filter(invoice::Column::TicketId.eq(ticket_id))
            .order_by_desc(invoice::Column::IssuedAt)
            .all(db)
            .await?)
    }

    /// Point-of-sale checkout: persists the transaction and its lines with
    /// totals computed by the same tax algorithm as ticket billing.
    #[instrument(skip(self, request))]
    pub async fn create_sale(
        &self,
        request: CreateSaleRequest,
    ) -> Result<SaleResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if request.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A sale requires at least one item".into(),
            ));
        }

        let mut subtotal = Decimal::ZERO;
        let mut tax_amount = Decimal::ZERO;
        let mut lines = Vec::with_capacity(request.items.len());
        for input in &request.items {
            if input.quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Quantity must be positive".into(),
                ));
            }
            let tax_rate = input.tax_rate.unwrap_or(self.default_tax_rate);
            let line_total = input.unit_price * input.quantity;
            let (pre_tax, tax) = line_amounts(
                input.unit_price,
                input.quantity,
                line_total,
                tax_rate,
                input.tax_inclusive,
            )?;
            subtotal += pre_tax;
            tax_amount += tax;
            lines.push((input, tax_rate, line_total));
        }
        let subtotal = subtotal.round_dp(2);
        let tax_amount = tax_amount.round_dp(2);

        let db = &*self.db_pool;
        let txn = db.begin().await?;
        let now = Utc::now();
        let transaction_id = Uuid::new_v4();

        let transaction = sales_transaction::ActiveModel {
            id: Set(transaction_id),
            subtotal: Set(subtotal),
            tax_amount: Set(tax_amount),
            total: Set(subtotal + tax_amount),
            payment_method: Set(request.payment_method.clone()),
            created_by: Set(request.created_by.clone()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for (input, tax_rate, line_total) in lines {
            let item = sale_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                transaction_id: Set(transaction_id),
                description: Set(input.description.clone()),
                quantity: Set(input.quantity),
                unit_price: Set(input.unit_price),
                line_total: Set(line_total),
                tax_rate: Set(tax_rate),
                tax_inclusive: Set(input.tax_inclusive),
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender
                .send(Event::SaleCompleted {
                    transaction_id,
                    total: transaction.total,
                })
                .await
            {
                warn!(error = %e, "Failed to send sale completed event");
            }
        }

        Ok(SaleResponse { transaction, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(
        unit_price: Decimal,
        quantity: Decimal,
        line_total: Decimal,
        tax_rate: Decimal,
        tax_inclusive: bool,
    ) -> billable_item::Model {
        billable_item::Model {
            id: Uuid::new_v4(),
            ticket_id: Uuid::new_v4(),
            invoice_id: None,
            kind: "part".to_string(),
            description: "test".to_string(),
            quantity,
            unit_price,
            line_total,
            tax_rate,
            tax_inclusive,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn exclusive_item_adds_tax_on_top() {
        let items = vec![item(dec!(100), dec!(1), dec!(100), dec!(10), false)];
        let totals = calculate_totals(&items).unwrap();
        assert_eq!(totals.subtotal, dec!(100.00));
        assert_eq!(totals.tax_amount, dec!(10.00));
        assert_eq!(totals.total, dec!(110.00));
    }

    #[test]
    fn inclusive_item_backs_tax_out_of_line_total() {
        let items = vec![item(dec!(110), dec!(1), dec!(110), dec!(10), true)];
        let totals = calculate_totals(&items).unwrap();
        assert_eq!(totals.subtotal, dec!(100.00));
        assert_eq!(totals.tax_amount, dec!(10.00));
        assert_eq!(totals.total, dec!(110.00));
    }

    #[test]
    fn mixed_items_accumulate_both_sides() {
        let items = vec![
            item(dec!(100), dec!(1), dec!(100), dec!(10), false),
            item(dec!(110), dec!(1), dec!(110), dec!(10), true),
            item(dec!(25), dec!(4), dec!(100), dec!(0), false),
        ];
        let totals = calculate_totals(&items).unwrap();
        assert_eq!(totals.subtotal, dec!(300.00));
        assert_eq!(totals.tax_amount, dec!(20.00));
        assert_eq!(totals.total, dec!(320.00));
    }

    #[test]
    fn totals_are_idempotent() {
        let items = vec![
            item(dec!(19.99), dec!(3), dec!(59.97), dec!(8.25), false),
            item(dec!(42.50), dec!(1), dec!(42.50), dec!(8.25), true),
        ];
        let first = calculate_totals(&items).unwrap();
        let second = calculate_totals(&items).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.subtotal + first.tax_amount, first.total);
    }

    #[test]
    fn empty_item_list_yields_zero_totals() {
        let totals = calculate_totals(&[]).unwrap();
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn minus_one_hundred_percent_rate_is_rejected() {
        let items = vec![item(dec!(50), dec!(1), dec!(50), dec!(-100), true)];
        assert!(matches!(
            calculate_totals(&items),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn negative_but_valid_rate_discounts_tax() {
        // A -50% inclusive rate still divides cleanly; nothing blows up.
        let items = vec![item(dec!(50), dec!(1), dec!(50), dec!(-50), true)];
        let totals = calculate_totals(&items).unwrap();
        assert_eq!(totals.subtotal, dec!(100.00));
        assert_eq!(totals.tax_amount, dec!(-50.00));
        assert_eq!(totals.total, dec!(50.00));
    }
}
