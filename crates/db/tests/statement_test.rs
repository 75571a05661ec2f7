//! Party statement integration tests.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::*;
use tally_core::credit_note::CreditNoteItemInput;
use tally_core::statement::{BalanceSide, EntryKind, StatementError};
use tally_db::repositories::{
    CreateCreditNoteInput, CreatePurchaseInvoiceInput, CreditNoteRepository, PaymentRepository,
    PurchaseInvoiceRepository, RecordPaymentInput, RecordPurchasePaymentInput,
    StatementRepository,
};

async fn seed_ledger(db: &sea_orm::DatabaseConnection) -> uuid::Uuid {
    let party = create_party_with_balances(db, "Apex Auto", dec!(1000), dec!(200)).await;

    let order = dispatched_order(db, party, "PO-400", dec!(100), dec!(10), dec!(500)).await;
    let invoice = issue_invoice(db, &order, dec!(10), dec!(500), date(2025, 2, 10)).await;

    PaymentRepository::new(db.clone(), billing().bulk_limit)
        .record_payment(RecordPaymentInput {
            invoice_id: invoice.id,
            amount: dec!(900),
            payment_date: date(2025, 2, 10),
            mode: Some("NEFT".to_string()),
            reference: Some("UTR-400".to_string()),
            remarks: None,
        })
        .await
        .unwrap();

    let bills = PurchaseInvoiceRepository::new(db.clone());
    let bill = bills
        .create_purchase_invoice(CreatePurchaseInvoiceInput {
            party_id: party,
            supplier_invoice_number: "SUP-77".to_string(),
            invoice_date: date(2025, 2, 12),
            total_amount: dec!(1500),
            remarks: None,
        })
        .await
        .unwrap();
    bills
        .record_purchase_payment(RecordPurchasePaymentInput {
            purchase_invoice_id: bill.id,
            amount: dec!(500),
            payment_date: date(2025, 2, 15),
            mode: None,
            reference: None,
            remarks: None,
        })
        .await
        .unwrap();

    let notes = CreditNoteRepository::new(db.clone(), billing());
    let note = |amount| CreateCreditNoteInput {
        party_id: party,
        credit_note_date: date(2025, 2, 25),
        reason: None,
        items: vec![CreditNoteItemInput {
            description: "Short supply".to_string(),
            qty: dec!(1),
            rate: amount,
        }],
    };
    notes.create_credit_note(note(dec!(100))).await.unwrap();
    let withdrawn = notes.create_credit_note(note(dec!(999))).await.unwrap();
    notes.cancel_credit_note(withdrawn.id).await.unwrap();

    party
}

#[tokio::test]
async fn test_statement_orders_and_balances_entries() {
    let db = setup_db().await;
    let party = seed_ledger(&db).await;

    let statement = StatementRepository::new(db.clone())
        .get_party_statement(party, None, None)
        .await
        .unwrap()
        .expect("party exists");

    assert_eq!(statement.party.name, "Apex Auto");
    assert_eq!(statement.opening_balance, dec!(800));

    let kinds: Vec<EntryKind> = statement.entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::Invoice,
            EntryKind::Payment,
            EntryKind::PurchaseInvoice,
            EntryKind::SupplierPayment,
            EntryKind::CreditNote,
        ]
    );

    let balances: Vec<Decimal> = statement.entries.iter().map(|e| e.balance).collect();
    assert_eq!(
        balances,
        vec![dec!(6700), dec!(5800), dec!(4300), dec!(4800), dec!(4700)]
    );
    assert_eq!(statement.entries[0].debit, dec!(5900));
    assert_eq!(statement.entries[1].reference, "UTR-400");
    assert_eq!(statement.entries[3].debit, dec!(500));
    assert_eq!(statement.closing_balance, dec!(4700));
    assert_eq!(statement.closing_side, BalanceSide::Dr);
}

#[tokio::test]
async fn test_filtered_statement_keeps_master_opening_balance() {
    let db = setup_db().await;
    let party = seed_ledger(&db).await;

    let statement = StatementRepository::new(db.clone())
        .get_party_statement(party, Some(date(2025, 2, 11)), Some(date(2025, 2, 20)))
        .await
        .unwrap()
        .expect("party exists");

    assert_eq!(statement.opening_balance, dec!(800));
    assert_eq!(statement.entries.len(), 2);
    assert_eq!(statement.entries[0].balance, dec!(-700));
    assert_eq!(statement.entries[0].side, BalanceSide::Cr);
    assert_eq!(statement.closing_balance, dec!(-200));
    assert_eq!(statement.closing_side, BalanceSide::Cr);
}

#[tokio::test]
async fn test_empty_window_closes_at_opening_balance() {
    let db = setup_db().await;
    let party = seed_ledger(&db).await;

    let statement = StatementRepository::new(db.clone())
        .get_party_statement(party, Some(date(2026, 1, 1)), None)
        .await
        .unwrap()
        .expect("party exists");

    assert!(statement.entries.is_empty());
    assert_eq!(statement.closing_balance, dec!(800));
}

#[tokio::test]
async fn test_unknown_party_and_inverted_range() {
    let db = setup_db().await;
    let repo = StatementRepository::new(db.clone());

    let missing = repo
        .get_party_statement(uuid::Uuid::new_v4(), None, None)
        .await
        .unwrap();
    assert!(missing.is_none());

    let err = repo
        .get_party_statement(uuid::Uuid::new_v4(), Some(date(2025, 3, 1)), Some(date(2025, 2, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, StatementError::InvalidDateRange { .. }));
}
