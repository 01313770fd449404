mod common;

use assert_matches::assert_matches;
use chrono::{Datelike, Utc};
use rust_decimal_macros::dec;
use ticketflow_api::services::billing::{
    CreateBillableItemRequest, CreateSaleRequest, SaleItemInput,
};
use ticketflow_api::ServiceError;
use uuid::Uuid;

fn part_item(ticket_id: Uuid, unit_price: rust_decimal::Decimal) -> CreateBillableItemRequest {
    CreateBillableItemRequest {
        ticket_id,
        kind: "part".to_string(),
        description: "Replacement display cable".to_string(),
        quantity: dec!(1),
        unit_price,
        line_total: None,
        tax_rate: None,
        tax_inclusive: false,
    }
}

#[tokio::test]
async fn invoice_generation_consumes_unbilled_items() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    app.services
        .billing
        .create_billable_item(CreateBillableItemRequest {
            tax_rate: Some(dec!(10)),
            ..part_item(ticket.id, dec!(100))
        })
        .await
        .unwrap();
    app.services
        .billing
        .create_billable_item(CreateBillableItemRequest {
            kind: "labor".to_string(),
            description: "Diagnosis and reassembly".to_string(),
            quantity: dec!(1),
            unit_price: dec!(110),
            line_total: Some(dec!(110)),
            tax_rate: Some(dec!(10)),
            tax_inclusive: true,
            ticket_id: ticket.id,
        })
        .await
        .unwrap();

    let unbilled = app.services.billing.get_unbilled_items(Some(ticket.id)).await.unwrap();
    assert_eq!(unbilled.len(), 2);

    let invoice = app
        .services
        .billing
        .generate_invoice_for_ticket(ticket.id)
        .await
        .unwrap();
    assert_eq!(
        invoice.invoice_number,
        format!("INV-{}-001", Utc::now().year())
    );
    assert_eq!(invoice.subtotal, dec!(200.00));
    assert_eq!(invoice.tax_amount, dec!(20.00));
    assert_eq!(invoice.total, dec!(220.00));

    // Everything is now attached to the invoice.
    let unbilled = app.services.billing.get_unbilled_items(Some(ticket.id)).await.unwrap();
    assert!(unbilled.is_empty());

    let invoices = app
        .services
        .billing
        .list_invoices_for_ticket(ticket.id)
        .await
        .unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].id, invoice.id);
}

#[tokio::test]
async fn marking_items_billed_flips_invoice_id_in_bulk() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let first = app
        .services
        .billing
        .create_billable_item(part_item(ticket.id, dec!(30)))
        .await
        .unwrap();
    let second = app
        .services
        .billing
        .create_billable_item(part_item(ticket.id, dec!(45)))
        .await
        .unwrap();
    assert!(first.invoice_id.is_none());

    let invoice_id = Uuid::new_v4();
    let affected = app
        .services
        .billing
        .mark_items_billed(&*app.db, &[first.id, second.id], invoice_id)
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let unbilled = app
        .services
        .billing
        .get_unbilled_items(Some(ticket.id))
        .await
        .unwrap();
    assert!(unbilled.is_empty());

    // An empty batch is a no-op.
    let affected = app
        .services
        .billing
        .mark_items_billed(&*app.db, &[], Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(affected, 0);
}

#[tokio::test]
async fn generating_with_nothing_to_bill_fails() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let result = app
        .services
        .billing
        .generate_invoice_for_ticket(ticket.id)
        .await;
    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));

    // The same applies right after a successful generation.
    app.services
        .billing
        .create_billable_item(part_item(ticket.id, dec!(50)))
        .await
        .unwrap();
    app.services
        .billing
        .generate_invoice_for_ticket(ticket.id)
        .await
        .unwrap();
    let result = app
        .services
        .billing
        .generate_invoice_for_ticket(ticket.id)
        .await;
    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn shop_default_tax_rate_fills_in_when_absent() {
    let app = common::setup_with_tax(dec!(8.25)).await;
    let ticket = common::seed_ticket(&app).await;

    let item = app
        .services
        .billing
        .create_billable_item(part_item(ticket.id, dec!(100)))
        .await
        .unwrap();
    assert_eq!(item.tax_rate, dec!(8.25));

    let invoice = app
        .services
        .billing
        .generate_invoice_for_ticket(ticket.id)
        .await
        .unwrap();
    assert_eq!(invoice.subtotal, dec!(100.00));
    assert_eq!(invoice.tax_amount, dec!(8.25));
    assert_eq!(invoice.total, dec!(108.25));
}

#[tokio::test]
async fn minus_one_hundred_percent_inclusive_rate_is_rejected_at_creation() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let result = app
        .services
        .billing
        .create_billable_item(CreateBillableItemRequest {
            tax_rate: Some(dec!(-100)),
            tax_inclusive: true,
            ..part_item(ticket.id, dec!(50))
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn unknown_item_kind_and_bad_quantity_are_rejected() {
    let app = common::setup().await;
    let ticket = common::seed_ticket(&app).await;

    let result = app
        .services
        .billing
        .create_billable_item(CreateBillableItemRequest {
            kind: "mystery".to_string(),
            ..part_item(ticket.id, dec!(50))
        })
        .await;
    assert_matches!(result, Err(ServiceError::InvalidInput(_)));

    let result = app
        .services
        .billing
        .create_billable_item(CreateBillableItemRequest {
            quantity: dec!(0),
            ..part_item(ticket.id, dec!(50))
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn items_for_a_missing_ticket_are_rejected() {
    let app = common::setup().await;
    let result = app
        .services
        .billing
        .create_billable_item(part_item(Uuid::new_v4(), dec!(50)))
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn pos_sale_uses_the_same_tax_math() {
    let app = common::setup().await;

    let sale = app
        .services
        .billing
        .create_sale(CreateSaleRequest {
            items: vec![
                SaleItemInput {
                    description: "USB-C cable".to_string(),
                    quantity: dec!(2),
                    unit_price: dec!(9.50),
                    tax_rate: Some(dec!(10)),
                    tax_inclusive: false,
                },
                SaleItemInput {
                    description: "Screen protector".to_string(),
                    quantity: dec!(1),
                    unit_price: dec!(11),
                    tax_rate: Some(dec!(10)),
                    tax_inclusive: true,
                },
            ],
            payment_method: "card".to_string(),
            created_by: Some("front-desk".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.transaction.subtotal, dec!(29.00));
    assert_eq!(sale.transaction.tax_amount, dec!(2.90));
    assert_eq!(sale.transaction.total, dec!(31.90));
}

#[tokio::test]
async fn empty_sale_is_rejected() {
    let app = common::setup().await;
    let result = app
        .services
        .billing
        .create_sale(CreateSaleRequest {
            items: Vec::new(),
            payment_method: "cash".to_string(),
            created_by: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}
