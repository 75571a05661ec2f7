//! Database seeder for Tally development and testing.
//!
//! Seeds a customer, a supplier and one full order-to-cash cycle: a purchase
//! order, gate passes, an invoice, a part payment, a credit note and a
//! supplier bill.
//!
//! Usage: cargo run --bin seeder

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use uuid::Uuid;

use tally_core::credit_note::CreditNoteItemInput;
use tally_core::invoice::RequestedLine;
use tally_db::entities::{parties, sea_orm_active_enums::PartyKind};
use tally_db::repositories::{
    CreateCreditNoteInput, CreateInvoiceInput, CreatePartyInput, CreatePurchaseInvoiceInput,
    CreatePurchaseOrderInput, CreditNoteRepository, InvoiceRepository, NewLineItem,
    PartyRepository, PaymentRepository, PurchaseInvoiceRepository, PurchaseOrderRepository,
    RecordPaymentInput,
};
use tally_shared::BillingConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tally_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let existing = parties::Entity::find()
        .count(&db)
        .await
        .expect("Failed to count parties");
    if existing > 0 {
        println!("  Parties already exist, skipping...");
        return;
    }

    let billing = BillingConfig::default();

    println!("Seeding parties...");
    let customer = seed_party(&db, "Apex Auto Components", PartyKind::Customer, dec!(800)).await;
    let supplier = seed_party(&db, "Bharat Steel Traders", PartyKind::Supplier, Decimal::ZERO).await;

    println!("Seeding purchase order and gate passes...");
    let (po_id, line_id) = seed_order(&db, customer).await;

    println!("Seeding invoice and payment...");
    let invoice_id = seed_invoice(&db, &billing, po_id, line_id).await;

    println!("Seeding credit note...");
    seed_credit_note(&db, &billing, customer, invoice_id).await;

    println!("Seeding supplier bill...");
    seed_supplier_bill(&db, supplier).await;

    println!("Seeding complete!");
}

fn seed_date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid seed date")
}

async fn seed_party(
    db: &DatabaseConnection,
    name: &str,
    kind: PartyKind,
    receivable_balance: Decimal,
) -> Uuid {
    let party = PartyRepository::new(db.clone())
        .create_party(CreatePartyInput {
            name: name.to_string(),
            gstin: None,
            kind,
            receivable_balance,
            payable_balance: Decimal::ZERO,
        })
        .await
        .expect("Failed to create party");
    println!("  Created party: {name}");
    party.id
}

async fn seed_order(db: &DatabaseConnection, customer: Uuid) -> (Uuid, Uuid) {
    let repo = PurchaseOrderRepository::new(db.clone());
    let order = repo
        .create_purchase_order(CreatePurchaseOrderInput {
            po_number: "APX/PO/0412".to_string(),
            party_id: customer,
            po_date: seed_date(1, 2),
            delivery_date: Some(seed_date(2, 28)),
            line_items: vec![NewLineItem {
                part_number: "BRK-220".to_string(),
                description: "Brake bracket, machined".to_string(),
                unit: "NOS".to_string(),
                rate: dec!(500),
                qty_ordered: dec!(100),
            }],
        })
        .await
        .expect("Failed to create purchase order");

    let line_id = order.line_items[0].id;
    repo.record_inward(line_id, dec!(80))
        .await
        .expect("Failed to record inward gate pass");
    repo.record_outward(line_id, dec!(60))
        .await
        .expect("Failed to record outward gate pass");
    println!("  Created PO APX/PO/0412 with 60 of 100 dispatched");

    (order.purchase_order.id, line_id)
}

async fn seed_invoice(
    db: &DatabaseConnection,
    billing: &BillingConfig,
    po_id: Uuid,
    line_id: Uuid,
) -> Uuid {
    let invoice = InvoiceRepository::new(db.clone(), billing.clone())
        .create_invoice(CreateInvoiceInput {
            purchase_order_id: po_id,
            invoice_date: seed_date(2, 10),
            remarks: None,
            lines: vec![RequestedLine {
                po_line_item_id: line_id,
                qty: dec!(60),
                rate: dec!(500),
            }],
        })
        .await
        .expect("Failed to create invoice");
    println!(
        "  Created invoice {} for {}",
        invoice.invoice_number, invoice.total_amount
    );

    PaymentRepository::new(db.clone(), billing.bulk_limit)
        .record_payment(RecordPaymentInput {
            invoice_id: invoice.id,
            amount: dec!(20000),
            payment_date: seed_date(2, 20),
            mode: Some("NEFT".to_string()),
            reference: Some("UTR-SEED-1".to_string()),
            remarks: None,
        })
        .await
        .expect("Failed to record payment");
    println!("  Recorded payment of 20000.00");

    invoice.id
}

async fn seed_credit_note(
    db: &DatabaseConnection,
    billing: &BillingConfig,
    customer: Uuid,
    invoice_id: Uuid,
) {
    let repo = CreditNoteRepository::new(db.clone(), billing.clone());
    let note = repo
        .create_credit_note(CreateCreditNoteInput {
            party_id: customer,
            credit_note_date: seed_date(2, 25),
            reason: Some("Rejected on inspection".to_string()),
            items: vec![CreditNoteItemInput {
                description: "BRK-220 rejected".to_string(),
                qty: dec!(2),
                rate: dec!(500),
            }],
        })
        .await
        .expect("Failed to create credit note");

    repo.adjust_credit_note_against_invoice(note.id, invoice_id)
        .await
        .expect("Failed to adjust credit note");
    println!("  Created and adjusted credit note {}", note.credit_note_number);
}

async fn seed_supplier_bill(db: &DatabaseConnection, supplier: Uuid) {
    PurchaseInvoiceRepository::new(db.clone())
        .create_purchase_invoice(CreatePurchaseInvoiceInput {
            party_id: supplier,
            supplier_invoice_number: "BST/2425/118".to_string(),
            invoice_date: seed_date(1, 20),
            total_amount: dec!(11800),
            remarks: None,
        })
        .await
        .expect("Failed to create purchase invoice");
    println!("  Created supplier bill BST/2425/118");
}
