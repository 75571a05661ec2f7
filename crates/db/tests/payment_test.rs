//! Payment ledger integration tests.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use common::*;
use tally_core::payment::PaymentError;
use tally_db::entities::{audit_logs, payments, sea_orm_active_enums::InvoiceStatus};
use tally_db::repositories::{BULK_PAYMENT_MODE, PaymentRepository, RecordPaymentInput};

fn payment(invoice_id: uuid::Uuid, amount: Decimal) -> RecordPaymentInput {
    RecordPaymentInput {
        invoice_id,
        amount,
        payment_date: date(2025, 2, 20),
        mode: Some("NEFT".to_string()),
        reference: Some("UTR-1".to_string()),
        remarks: None,
    }
}

fn repo(db: &sea_orm::DatabaseConnection) -> PaymentRepository {
    PaymentRepository::new(db.clone(), billing().bulk_limit)
}

#[tokio::test]
async fn test_full_payment_settles_invoice() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let order = dispatched_order(&db, party, "PO-200", dec!(100), dec!(60), dec!(500)).await;
    let invoice = issue_invoice(&db, &order, dec!(60), dec!(500), fy_2024_date()).await;

    repo(&db)
        .record_payment(payment(invoice.id, dec!(35400)))
        .await
        .unwrap();

    let invoice = reload_invoice(&db, invoice.id).await;
    assert_eq!(invoice.paid_amount, dec!(35400));
    assert_eq!(invoice.balance_due, Decimal::ZERO);
    assert_eq!(invoice.status, InvoiceStatus::Paid);
}

#[tokio::test]
async fn test_partial_payments_accumulate() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let order = dispatched_order(&db, party, "PO-201", dec!(100), dec!(10), dec!(500)).await;
    let invoice = issue_invoice(&db, &order, dec!(10), dec!(500), fy_2024_date()).await;
    assert_eq!(invoice.total_amount, dec!(5900));

    repo(&db).record_payment(payment(invoice.id, dec!(2000))).await.unwrap();
    let after_first = reload_invoice(&db, invoice.id).await;
    assert_eq!(after_first.status, InvoiceStatus::PartiallyPaid);
    assert_eq!(after_first.balance_due, dec!(3900));

    repo(&db).record_payment(payment(invoice.id, dec!(3900))).await.unwrap();
    let after_second = reload_invoice(&db, invoice.id).await;
    assert_eq!(after_second.status, InvoiceStatus::Paid);
    assert_eq!(after_second.paid_amount, dec!(5900));

    let rows = payments::Entity::find()
        .filter(payments::Column::InvoiceId.eq(invoice.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_overpayment_names_remaining_balance() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let order = dispatched_order(&db, party, "PO-202", dec!(100), dec!(10), dec!(500)).await;
    let invoice = issue_invoice(&db, &order, dec!(10), dec!(500), fy_2024_date()).await;
    repo(&db).record_payment(payment(invoice.id, dec!(5000))).await.unwrap();

    let err = repo(&db)
        .record_payment(payment(invoice.id, dec!(1000)))
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::ExceedsBalance { remaining } if remaining == dec!(900)));
    assert!(err.to_string().contains("900"));

    let unchanged = reload_invoice(&db, invoice.id).await;
    assert_eq!(unchanged.paid_amount, dec!(5000));
}

#[tokio::test]
async fn test_non_positive_and_unknown_invoice_are_rejected() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let order = dispatched_order(&db, party, "PO-203", dec!(100), dec!(10), dec!(500)).await;
    let invoice = issue_invoice(&db, &order, dec!(10), dec!(500), fy_2024_date()).await;

    let err = repo(&db)
        .record_payment(payment(invoice.id, Decimal::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::NonPositiveAmount));

    let missing = uuid::Uuid::new_v4();
    let err = repo(&db)
        .record_payment(payment(missing, dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::InvoiceNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_bulk_mark_as_paid() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let order = dispatched_order(&db, party, "PO-204", dec!(100), dec!(30), dec!(500)).await;
    let partly = issue_invoice(&db, &order, dec!(10), dec!(500), fy_2024_date()).await;
    let untouched = issue_invoice(&db, &order, dec!(10), dec!(500), fy_2024_date()).await;
    let settled = issue_invoice(&db, &order, dec!(10), dec!(500), fy_2024_date()).await;

    repo(&db).record_payment(payment(partly.id, dec!(900))).await.unwrap();
    repo(&db).record_payment(payment(settled.id, dec!(5900))).await.unwrap();

    let count = repo(&db)
        .bulk_mark_as_paid(&[partly.id, untouched.id, settled.id, partly.id])
        .await
        .unwrap();
    assert_eq!(count, 2);

    for id in [partly.id, untouched.id, settled.id] {
        let invoice = reload_invoice(&db, id).await;
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.paid_amount, dec!(5900));
        assert_eq!(invoice.balance_due, Decimal::ZERO);
    }

    let bulk_rows = payments::Entity::find()
        .filter(payments::Column::Mode.eq(BULK_PAYMENT_MODE))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(bulk_rows.len(), 2);
    let synthesized: Decimal = bulk_rows.iter().map(|p| p.amount).sum();
    assert_eq!(synthesized, dec!(5000) + dec!(5900));

    let audits = audit_logs::Entity::find()
        .filter(audit_logs::Column::Action.eq("BULK_MARK_PAID"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);
}

#[tokio::test]
async fn test_bulk_with_unknown_id_changes_nothing() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let order = dispatched_order(&db, party, "PO-205", dec!(100), dec!(10), dec!(500)).await;
    let invoice = issue_invoice(&db, &order, dec!(10), dec!(500), fy_2024_date()).await;

    let err = repo(&db)
        .bulk_mark_as_paid(&[invoice.id, uuid::Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::InvoiceNotFound(_)));

    let unchanged = reload_invoice(&db, invoice.id).await;
    assert_eq!(unchanged.status, InvoiceStatus::Draft);
    assert_eq!(unchanged.paid_amount, Decimal::ZERO);

    let err = repo(&db).bulk_mark_as_paid(&[]).await.unwrap_err();
    assert!(matches!(err, PaymentError::EmptyBatch));
}

#[tokio::test]
async fn test_bulk_limit_is_enforced() {
    let db = setup_db().await;
    let ids: Vec<uuid::Uuid> = (0..3).map(|_| uuid::Uuid::new_v4()).collect();

    let err = PaymentRepository::new(db.clone(), 2)
        .bulk_mark_as_paid(&ids)
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::TooManyInvoices { count: 3, limit: 2 }));
}

#[tokio::test]
async fn test_paid_invoice_accepts_no_further_payment() {
    let db = setup_db().await;
    let party = create_party(&db, "Apex Auto").await;
    let order = dispatched_order(&db, party, "PO-260", dec!(10), dec!(10), dec!(500)).await;
    let invoice = issue_invoice(&db, &order, dec!(10), dec!(500), fy_2024_date()).await;
    assert_eq!(invoice.total_amount, dec!(5900));

    tally_db::repositories::InvoiceRepository::new(db.clone(), billing())
        .update_payment_status(invoice.id, tally_core::invoice::InvoiceStatus::Paid)
        .await
        .unwrap();

    let err = repo(&db)
        .record_payment(payment(invoice.id, dec!(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::InvoicePaid(id) if id == invoice.id));

    let reloaded = reload_invoice(&db, invoice.id).await;
    assert_eq!(reloaded.status, InvoiceStatus::Paid);
    assert_eq!(reloaded.paid_amount, Decimal::ZERO);
    assert!(
        repo(&db)
            .list_invoice_payments(invoice.id)
            .await
            .unwrap()
            .is_empty()
    );
}
