//! Credit note integration tests.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::*;
use tally_core::credit_note::{CreditNoteError, CreditNoteItemInput};
use tally_core::payment::PaymentStatus;
use tally_db::entities::sea_orm_active_enums::{CreditNoteStatus, InvoiceStatus};
use tally_db::repositories::{
    CreateCreditNoteInput, CreditNoteRepository, PaymentRepository, RecordPaymentInput,
};

fn repo(db: &sea_orm::DatabaseConnection) -> CreditNoteRepository {
    CreditNoteRepository::new(db.clone(), billing())
}

fn credit_input(party_id: uuid::Uuid, amount: Decimal) -> CreateCreditNoteInput {
    CreateCreditNoteInput {
        party_id,
        credit_note_date: date(2025, 2, 25),
        reason: Some("Rejected parts".to_string()),
        items: vec![CreditNoteItemInput {
            description: "Rejected brackets".to_string(),
            qty: dec!(1),
            rate: amount,
        }],
    }
}

/// Invoice of 35400 with 27400 received, leaving 8000 due.
async fn invoice_with_balance_8000(
    db: &sea_orm::DatabaseConnection,
    party: uuid::Uuid,
) -> uuid::Uuid {
    let order = dispatched_order(db, party, "PO-300", dec!(100), dec!(60), dec!(500)).await;
    let invoice = issue_invoice(db, &order, dec!(60), dec!(500), fy_2024_date()).await;
    PaymentRepository::new(db.clone(), billing().bulk_limit)
        .record_payment(RecordPaymentInput {
            invoice_id: invoice.id,
            amount: dec!(27400),
            payment_date: date(2025, 2, 20),
            mode: None,
            reference: None,
            remarks: None,
        })
        .await
        .unwrap();
    invoice.id
}

#[tokio::test]
async fn test_credit_note_numbers_are_sequential() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;

    let first = repo(&db).create_credit_note(credit_input(party, dec!(100))).await.unwrap();
    let second = repo(&db).create_credit_note(credit_input(party, dec!(250))).await.unwrap();

    assert_eq!(first.credit_note_number, "CN-001");
    assert_eq!(second.credit_note_number, "CN-002");
    assert_eq!(second.total_amount, dec!(250));
    assert_eq!(second.status, CreditNoteStatus::Pending);

    let loaded = repo(&db).get_credit_note(second.id).await.unwrap();
    assert_eq!(loaded.items.len(), 1);
    assert_eq!(loaded.items[0].amount, dec!(250));
}

#[tokio::test]
async fn test_adjustment_reduces_balance() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let invoice_id = invoice_with_balance_8000(&db, party).await;
    let note = repo(&db).create_credit_note(credit_input(party, dec!(5000))).await.unwrap();

    let adjustment = repo(&db)
        .adjust_credit_note_against_invoice(note.id, invoice_id)
        .await
        .unwrap();
    assert_eq!(adjustment.applied, dec!(5000));
    assert_eq!(adjustment.status, PaymentStatus::PartiallyPaid);

    let invoice = reload_invoice(&db, invoice_id).await;
    assert_eq!(invoice.balance_due, dec!(3000));
    assert_eq!(invoice.paid_amount, dec!(32400));
    assert_eq!(invoice.status, InvoiceStatus::PartiallyPaid);

    let note = repo(&db).get_credit_note(note.id).await.unwrap().credit_note;
    assert_eq!(note.status, CreditNoteStatus::Adjusted);
    assert_eq!(note.adjusted_invoice_id, Some(invoice_id));
    assert_eq!(note.applied_amount, Some(dec!(5000)));
}

#[tokio::test]
async fn test_second_adjustment_is_rejected_and_changes_nothing() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let invoice_id = invoice_with_balance_8000(&db, party).await;
    let note = repo(&db).create_credit_note(credit_input(party, dec!(5000))).await.unwrap();

    repo(&db)
        .adjust_credit_note_against_invoice(note.id, invoice_id)
        .await
        .unwrap();
    let before = reload_invoice(&db, invoice_id).await;

    let err = repo(&db)
        .adjust_credit_note_against_invoice(note.id, invoice_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CreditNoteError::AlreadyAdjusted));
    assert!(err.to_string().contains("already adjusted"));

    let after = reload_invoice(&db, invoice_id).await;
    assert_eq!(before.paid_amount, after.paid_amount);
    assert_eq!(before.balance_due, after.balance_due);
    assert_eq!(before.status, after.status);
}

#[tokio::test]
async fn test_excess_credit_is_capped() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let invoice_id = invoice_with_balance_8000(&db, party).await;
    let note = repo(&db).create_credit_note(credit_input(party, dec!(9000))).await.unwrap();

    let adjustment = repo(&db)
        .adjust_credit_note_against_invoice(note.id, invoice_id)
        .await
        .unwrap();
    assert_eq!(adjustment.applied, dec!(8000));
    assert_eq!(adjustment.excess, dec!(1000));

    let invoice = reload_invoice(&db, invoice_id).await;
    assert_eq!(invoice.balance_due, Decimal::ZERO);
    assert_eq!(invoice.paid_amount, dec!(35400));
    assert_eq!(invoice.status, InvoiceStatus::Paid);
}

#[tokio::test]
async fn test_credit_for_another_party_is_rejected() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let stranger = create_party(&db, "Other Co").await;
    let invoice_id = invoice_with_balance_8000(&db, party).await;
    let note = repo(&db).create_credit_note(credit_input(stranger, dec!(500))).await.unwrap();

    let err = repo(&db)
        .adjust_credit_note_against_invoice(note.id, invoice_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CreditNoteError::PartyMismatch));
}

#[tokio::test]
async fn test_cancellation_only_from_pending() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let invoice_id = invoice_with_balance_8000(&db, party).await;

    let cancelled = repo(&db).create_credit_note(credit_input(party, dec!(100))).await.unwrap();
    let cancelled = repo(&db).cancel_credit_note(cancelled.id).await.unwrap();
    assert_eq!(cancelled.status, CreditNoteStatus::Cancelled);

    let err = repo(&db)
        .adjust_credit_note_against_invoice(cancelled.id, invoice_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CreditNoteError::Cancelled));

    let adjusted = repo(&db).create_credit_note(credit_input(party, dec!(100))).await.unwrap();
    repo(&db)
        .adjust_credit_note_against_invoice(adjusted.id, invoice_id)
        .await
        .unwrap();
    let err = repo(&db).cancel_credit_note(adjusted.id).await.unwrap_err();
    assert!(matches!(err, CreditNoteError::InvalidCancellation(_)));
}

#[tokio::test]
async fn test_credit_note_validation() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;

    let mut input = credit_input(party, dec!(100));
    input.items.clear();
    let err = repo(&db).create_credit_note(input).await.unwrap_err();
    assert!(matches!(err, CreditNoteError::NoItems));

    let err = repo(&db)
        .create_credit_note(credit_input(uuid::Uuid::new_v4(), dec!(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditNoteError::PartyNotFound(_)));
}

#[tokio::test]
async fn test_credit_cannot_reopen_paid_invoice() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let order = dispatched_order(&db, party, "PO-310", dec!(10), dec!(10), dec!(500)).await;
    let invoice = issue_invoice(&db, &order, dec!(10), dec!(500), fy_2024_date()).await;

    tally_db::repositories::InvoiceRepository::new(db.clone(), billing())
        .update_payment_status(invoice.id, tally_core::invoice::InvoiceStatus::Paid)
        .await
        .unwrap();

    let note = repo(&db).create_credit_note(credit_input(party, dec!(500))).await.unwrap();
    let err = repo(&db)
        .adjust_credit_note_against_invoice(note.id, invoice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CreditNoteError::InvoiceSettled(_)));

    let reloaded = reload_invoice(&db, invoice.id).await;
    assert_eq!(reloaded.status, InvoiceStatus::Paid);
    let note = repo(&db).get_credit_note(note.id).await.unwrap().credit_note;
    assert_eq!(note.status, CreditNoteStatus::Pending);
}

#[tokio::test]
async fn test_stored_total_matches_item_rows() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;

    let line = CreditNoteItemInput {
        description: "Washer rework".to_string(),
        qty: dec!(0.333),
        rate: dec!(1.55),
    };
    let note = repo(&db)
        .create_credit_note(CreateCreditNoteInput {
            party_id: party,
            credit_note_date: date(2025, 2, 25),
            reason: None,
            items: vec![line.clone(), line],
        })
        .await
        .unwrap();

    let loaded = repo(&db).get_credit_note(note.id).await.unwrap();
    let item_sum: Decimal = loaded.items.iter().map(|i| i.amount).sum();
    assert_eq!(item_sum, dec!(1.04));
    assert_eq!(loaded.credit_note.total_amount, item_sum);
}
