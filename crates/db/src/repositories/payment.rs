//! Payment repository: receipts against sales invoices and bulk settlement.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Expr,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use tally_core::invoice::InvoiceStatus as CoreInvoiceStatus;
use tally_core::payment::{PaymentError, PaymentOutcome, PaymentService};
use tally_shared::types::round_money;

use super::audit::{self, action, entity};
use crate::entities::{
    credit_notes, invoices, payments,
    sea_orm_active_enums::{CreditNoteStatus, InvoiceStatus, PaymentRecordStatus},
};

/// Payment mode recorded on payments synthesized by bulk settlement.
pub const BULK_PAYMENT_MODE: &str = "BULK";

fn db_err(e: DbErr) -> PaymentError {
    PaymentError::Database(e.to_string())
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Invoice being paid.
    pub invoice_id: Uuid,
    /// Amount received.
    pub amount: Decimal,
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// Payment mode, e.g. NEFT or cheque.
    pub mode: Option<String>,
    /// Bank or cheque reference.
    pub reference: Option<String>,
    /// Free-text remarks.
    pub remarks: Option<String>,
}

/// Everything settled against an invoice: received payments plus applied
/// credit notes.
pub(crate) async fn settled_amount<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
) -> Result<Decimal, DbErr> {
    let received: Vec<Decimal> = payments::Entity::find()
        .select_only()
        .column(payments::Column::Amount)
        .filter(payments::Column::InvoiceId.eq(invoice_id))
        .filter(payments::Column::Status.eq(PaymentRecordStatus::Received))
        .into_tuple()
        .all(conn)
        .await?;

    let credited: Vec<Option<Decimal>> = credit_notes::Entity::find()
        .select_only()
        .column(credit_notes::Column::AppliedAmount)
        .filter(credit_notes::Column::AdjustedInvoiceId.eq(invoice_id))
        .filter(credit_notes::Column::Status.eq(CreditNoteStatus::Adjusted))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(received.into_iter().sum::<Decimal>() + credited.into_iter().flatten().sum::<Decimal>())
}

/// Writes settlement amounts onto an invoice only if `paid_amount` still
/// holds the value read earlier in the transaction.
///
/// Returns false if another writer got there first.
pub(crate) async fn update_invoice_settlement(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
    prior_paid: Decimal,
    outcome: &PaymentOutcome,
) -> Result<bool, DbErr> {
    let status: InvoiceStatus = outcome.status.into();
    let result = invoices::Entity::update_many()
        .col_expr(invoices::Column::PaidAmount, Expr::value(outcome.paid_amount))
        .col_expr(invoices::Column::BalanceDue, Expr::value(outcome.balance_due))
        .col_expr(invoices::Column::Status, Expr::value(status))
        .col_expr(
            invoices::Column::UpdatedAt,
            Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())),
        )
        .filter(invoices::Column::Id.eq(invoice_id))
        .filter(invoices::Column::PaidAmount.eq(prior_paid))
        .exec(txn)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
    bulk_limit: usize,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, bulk_limit: usize) -> Self {
        Self { db, bulk_limit }
    }

    /// Records a payment against an invoice.
    ///
    /// The invoice row is locked for the duration of the transaction and the
    /// final update is guarded on the `paid_amount` read at the start.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NonPositiveAmount`, `PaymentError::ExceedsBalance`
    /// (naming the remaining balance), `PaymentError::InvoiceNotFound`,
    /// `PaymentError::InvoiceCancelled`, `PaymentError::InvoicePaid` or
    /// `PaymentError::ConcurrentModification`.
    pub async fn record_payment(
        &self,
        input: RecordPaymentInput,
    ) -> Result<payments::Model, PaymentError> {
        let amount = round_money(input.amount);
        let txn = self.db.begin().await.map_err(db_err)?;

        let invoice = invoices::Entity::find_by_id(input.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(PaymentError::InvoiceNotFound(input.invoice_id))?;

        match invoice.status {
            InvoiceStatus::Cancelled => return Err(PaymentError::InvoiceCancelled(invoice.id)),
            InvoiceStatus::Paid => {
                warn!(invoice_id = %invoice.id, amount = %amount, "Payment on paid invoice rejected");
                return Err(PaymentError::InvoicePaid(invoice.id));
            }
            _ => {}
        }

        let settled = settled_amount(&txn, invoice.id).await.map_err(db_err)?;
        let outcome = PaymentService::apply(invoice.total_amount, settled, amount).inspect_err(
            |e| warn!(invoice_id = %invoice.id, amount = %amount, error = %e, "Payment rejected"),
        )?;

        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice.id),
            amount: Set(amount),
            payment_date: Set(input.payment_date),
            mode: Set(input.mode),
            reference: Set(input.reference),
            remarks: Set(input.remarks),
            status: Set(PaymentRecordStatus::Received),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        if !update_invoice_settlement(&txn, invoice.id, invoice.paid_amount, &outcome)
            .await
            .map_err(db_err)?
        {
            warn!(invoice_id = %invoice.id, "Invoice changed while recording payment");
            return Err(PaymentError::ConcurrentModification);
        }

        audit::record(
            &txn,
            entity::PAYMENT,
            Some(payment.id),
            action::CREATE,
            json!({
                "invoice_id": invoice.id,
                "amount": amount,
                "paid_amount": outcome.paid_amount,
                "balance_due": outcome.balance_due,
                "status": outcome.status.as_str(),
            }),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            invoice_id = %invoice.id,
            payment_id = %payment.id,
            amount = %amount,
            status = %outcome.status,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Lists the payments of an invoice in date order.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Database` if the query fails.
    pub async fn list_invoice_payments(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<payments::Model>, PaymentError> {
        payments::Entity::find()
            .filter(payments::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(payments::Column::PaymentDate)
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Marks invoices as paid in one transaction.
    ///
    /// Each invoice that is not yet `PAID` (or `CANCELLED`) gets one payment
    /// for its outstanding remainder and is forced to `PAID`. Returns the
    /// number of invoices marked.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::EmptyBatch`, `PaymentError::TooManyInvoices`,
    /// `PaymentError::InvoiceNotFound` for an unknown id, or
    /// `PaymentError::ConcurrentModification`. Nothing is written on error.
    pub async fn bulk_mark_as_paid(&self, invoice_ids: &[Uuid]) -> Result<usize, PaymentError> {
        let ids = PaymentService::validate_bulk(invoice_ids, self.bulk_limit)?;
        let txn = self.db.begin().await.map_err(db_err)?;

        let found = invoices::Entity::find()
            .filter(invoices::Column::Id.is_in(ids.iter().copied()))
            .lock_exclusive()
            .all(&txn)
            .await
            .map_err(db_err)?;

        let today = Utc::now().date_naive();
        let mut marked = Vec::with_capacity(ids.len());

        for id in &ids {
            let invoice = found
                .iter()
                .find(|inv| inv.id == *id)
                .ok_or(PaymentError::InvoiceNotFound(*id))?;

            let status: CoreInvoiceStatus = invoice.status.into();
            if !PaymentService::is_bulk_settleable(status) {
                continue;
            }

            let settled = settled_amount(&txn, invoice.id).await.map_err(db_err)?;
            let settlement = PaymentService::settle_in_full(invoice.total_amount, settled);

            if let Some(amount) = settlement.payment_amount {
                payments::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    invoice_id: Set(invoice.id),
                    amount: Set(round_money(amount)),
                    payment_date: Set(today),
                    mode: Set(Some(BULK_PAYMENT_MODE.to_string())),
                    reference: Set(None),
                    remarks: Set(Some("Marked as paid".to_string())),
                    status: Set(PaymentRecordStatus::Received),
                    created_at: Set(Utc::now().into()),
                }
                .insert(&txn)
                .await
                .map_err(db_err)?;
            }

            if !update_invoice_settlement(
                &txn,
                invoice.id,
                invoice.paid_amount,
                &settlement.outcome,
            )
            .await
            .map_err(db_err)?
            {
                return Err(PaymentError::ConcurrentModification);
            }
            marked.push(invoice.id);
        }

        audit::record(
            &txn,
            entity::INVOICE,
            None,
            action::BULK_MARK_PAID,
            json!({ "invoice_ids": marked, "count": marked.len() }),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(requested = ids.len(), marked = marked.len(), "Invoices marked as paid");
        Ok(marked.len())
    }
}
