//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database. The pool is pinned to
//! one connection so the database lives as long as the pool does.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use tally_core::invoice::RequestedLine;
use tally_db::entities::{invoices, sea_orm_active_enums::PartyKind};
use tally_db::migration::MigratorTrait;
use tally_db::repositories::{
    CreateInvoiceInput, CreatePartyInput, CreatePurchaseOrderInput, InvoiceRepository,
    NewLineItem, PartyRepository, PurchaseOrderRepository,
};
use tally_db::Migrator;
use tally_shared::BillingConfig;

pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn billing() -> BillingConfig {
    BillingConfig::default()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A date inside fiscal year 2024-25.
pub fn fy_2024_date() -> NaiveDate {
    date(2025, 2, 10)
}

pub async fn create_party(db: &DatabaseConnection, name: &str) -> Uuid {
    create_party_with_balances(db, name, Decimal::ZERO, Decimal::ZERO).await
}

pub async fn create_party_with_balances(
    db: &DatabaseConnection,
    name: &str,
    receivable: Decimal,
    payable: Decimal,
) -> Uuid {
    PartyRepository::new(db.clone())
        .create_party(CreatePartyInput {
            name: name.to_string(),
            gstin: None,
            kind: PartyKind::Both,
            receivable_balance: receivable,
            payable_balance: payable,
        })
        .await
        .expect("Failed to create party")
        .id
}

/// A purchase order with one line.
pub struct OrderFixture {
    pub party_id: Uuid,
    pub po_id: Uuid,
    pub line_id: Uuid,
}

/// Creates a single-line order and pushes `dispatched` through the inward
/// and outward gates.
pub async fn dispatched_order(
    db: &DatabaseConnection,
    party_id: Uuid,
    po_number: &str,
    ordered: Decimal,
    dispatched: Decimal,
    rate: Decimal,
) -> OrderFixture {
    let repo = PurchaseOrderRepository::new(db.clone());
    let created = repo
        .create_purchase_order(CreatePurchaseOrderInput {
            po_number: po_number.to_string(),
            party_id,
            po_date: date(2025, 1, 2),
            delivery_date: None,
            line_items: vec![NewLineItem {
                part_number: format!("{po_number}-PART"),
                description: "Machined bracket".to_string(),
                unit: "NOS".to_string(),
                rate,
                qty_ordered: ordered,
            }],
        })
        .await
        .expect("Failed to create purchase order");

    let line_id = created.line_items[0].id;
    if dispatched > Decimal::ZERO {
        repo.record_inward(line_id, dispatched)
            .await
            .expect("Failed to record inward");
        repo.record_outward(line_id, dispatched)
            .await
            .expect("Failed to record outward");
    }

    OrderFixture {
        party_id,
        po_id: created.purchase_order.id,
        line_id,
    }
}

pub async fn issue_invoice(
    db: &DatabaseConnection,
    order: &OrderFixture,
    qty: Decimal,
    rate: Decimal,
    invoice_date: NaiveDate,
) -> invoices::Model {
    InvoiceRepository::new(db.clone(), billing())
        .create_invoice(CreateInvoiceInput {
            purchase_order_id: order.po_id,
            invoice_date,
            remarks: None,
            lines: vec![RequestedLine {
                po_line_item_id: order.line_id,
                qty,
                rate,
            }],
        })
        .await
        .expect("Failed to create invoice")
}

pub async fn reload_invoice(db: &DatabaseConnection, id: Uuid) -> invoices::Model {
    InvoiceRepository::new(db.clone(), billing())
        .get_invoice(id)
        .await
        .expect("Failed to load invoice")
        .invoice
}
