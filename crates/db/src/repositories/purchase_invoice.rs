//! Purchase invoice repository: supplier bills and payments made against
//! them.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use tally_core::payment::{PaymentError, PaymentService};
use tally_shared::AppError;
use tally_shared::types::round_money;

use super::audit::{self, action, entity};
use super::numbering::is_unique_violation;
use crate::entities::{
    parties, purchase_invoices, purchase_payments, sea_orm_active_enums::PaymentStatus,
};

/// Error types for purchase invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseInvoiceError {
    /// Supplier not found.
    #[error("Party not found: {0}")]
    PartyNotFound(Uuid),

    /// Supplier invoice number is required.
    #[error("Supplier invoice number is required")]
    NumberRequired,

    /// Total must be positive.
    #[error("Invoice total must be greater than zero")]
    NonPositiveTotal,

    /// Same supplier invoice booked twice.
    #[error("Supplier invoice {0} already recorded for this party")]
    Duplicate(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PurchaseInvoiceError> for AppError {
    fn from(err: PurchaseInvoiceError) -> Self {
        match err {
            PurchaseInvoiceError::PartyNotFound(_) => Self::NotFound(err.to_string()),
            PurchaseInvoiceError::NumberRequired | PurchaseInvoiceError::NonPositiveTotal => {
                Self::Validation(err.to_string())
            }
            PurchaseInvoiceError::Duplicate(_) => Self::Conflict(err.to_string()),
            PurchaseInvoiceError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for booking a supplier invoice.
#[derive(Debug, Clone)]
pub struct CreatePurchaseInvoiceInput {
    /// Supplier.
    pub party_id: Uuid,
    /// Number printed on the supplier's invoice.
    pub supplier_invoice_number: String,
    /// Supplier invoice date.
    pub invoice_date: NaiveDate,
    /// Invoice total including tax.
    pub total_amount: Decimal,
    /// Free-text remarks.
    pub remarks: Option<String>,
}

/// Input for paying a supplier invoice.
#[derive(Debug, Clone)]
pub struct RecordPurchasePaymentInput {
    /// Purchase invoice being paid.
    pub purchase_invoice_id: Uuid,
    /// Amount paid.
    pub amount: Decimal,
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Payment mode.
    pub mode: Option<String>,
    /// Bank or cheque reference.
    pub reference: Option<String>,
    /// Free-text remarks.
    pub remarks: Option<String>,
}

fn payment_db_err(e: DbErr) -> PaymentError {
    PaymentError::Database(e.to_string())
}

/// Purchase invoice repository.
#[derive(Debug, Clone)]
pub struct PurchaseInvoiceRepository {
    db: DatabaseConnection,
}

impl PurchaseInvoiceRepository {
    /// Creates a new purchase invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Books a supplier invoice as `UNPAID`.
    ///
    /// # Errors
    ///
    /// Returns an error if the supplier does not exist, the total is not
    /// positive or the supplier number was already booked for this party.
    pub async fn create_purchase_invoice(
        &self,
        input: CreatePurchaseInvoiceInput,
    ) -> Result<purchase_invoices::Model, PurchaseInvoiceError> {
        let number = input.supplier_invoice_number.trim().to_string();
        if number.is_empty() {
            return Err(PurchaseInvoiceError::NumberRequired);
        }
        let total = round_money(input.total_amount);
        if total <= Decimal::ZERO {
            return Err(PurchaseInvoiceError::NonPositiveTotal);
        }

        let txn = self.db.begin().await?;

        parties::Entity::find_by_id(input.party_id)
            .one(&txn)
            .await?
            .ok_or(PurchaseInvoiceError::PartyNotFound(input.party_id))?;

        let now = Utc::now();
        let inserted = purchase_invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            party_id: Set(input.party_id),
            supplier_invoice_number: Set(number.clone()),
            invoice_date: Set(input.invoice_date),
            total_amount: Set(total),
            paid_amount: Set(Decimal::ZERO),
            balance_due: Set(total),
            payment_status: Set(PaymentStatus::Unpaid),
            remarks: Set(input.remarks),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await;

        let bill = match inserted {
            Ok(bill) => bill,
            Err(e) if is_unique_violation(&e) => {
                warn!(party_id = %input.party_id, number = %number, "Duplicate supplier invoice");
                return Err(PurchaseInvoiceError::Duplicate(number));
            }
            Err(e) => return Err(e.into()),
        };

        audit::record(
            &txn,
            entity::PURCHASE_INVOICE,
            Some(bill.id),
            action::CREATE,
            json!({
                "supplier_invoice_number": bill.supplier_invoice_number,
                "party_id": bill.party_id,
                "total_amount": bill.total_amount,
            }),
        )
        .await?;

        txn.commit().await?;

        info!(purchase_invoice_id = %bill.id, total = %bill.total_amount, "Purchase invoice recorded");
        Ok(bill)
    }

    /// Records a payment made to a supplier.
    ///
    /// Same rules as sales-side payments: positive amount, no overpayment,
    /// status derived from the cumulative amount paid.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NonPositiveAmount`, `PaymentError::ExceedsBalance`,
    /// `PaymentError::PurchaseInvoiceNotFound` or
    /// `PaymentError::ConcurrentModification`.
    pub async fn record_purchase_payment(
        &self,
        input: RecordPurchasePaymentInput,
    ) -> Result<purchase_payments::Model, PaymentError> {
        let amount = round_money(input.amount);
        let txn = self.db.begin().await.map_err(payment_db_err)?;

        let bill = purchase_invoices::Entity::find_by_id(input.purchase_invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(payment_db_err)?
            .ok_or(PaymentError::PurchaseInvoiceNotFound(input.purchase_invoice_id))?;

        let paid: Vec<Decimal> = purchase_payments::Entity::find()
            .select_only()
            .column(purchase_payments::Column::Amount)
            .filter(purchase_payments::Column::PurchaseInvoiceId.eq(bill.id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(payment_db_err)?;
        let settled: Decimal = paid.into_iter().sum();

        let outcome = PaymentService::apply(bill.total_amount, settled, amount).inspect_err(|e| {
            warn!(purchase_invoice_id = %bill.id, amount = %amount, error = %e, "Supplier payment rejected");
        })?;

        let payment = purchase_payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            purchase_invoice_id: Set(bill.id),
            amount: Set(amount),
            payment_date: Set(input.payment_date),
            mode: Set(input.mode),
            reference: Set(input.reference),
            remarks: Set(input.remarks),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(payment_db_err)?;

        let status: PaymentStatus = outcome.status.into();
        let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
        let updated = purchase_invoices::Entity::update_many()
            .col_expr(purchase_invoices::Column::PaidAmount, Expr::value(outcome.paid_amount))
            .col_expr(purchase_invoices::Column::BalanceDue, Expr::value(outcome.balance_due))
            .col_expr(purchase_invoices::Column::PaymentStatus, Expr::value(status))
            .col_expr(purchase_invoices::Column::UpdatedAt, Expr::value(now))
            .filter(purchase_invoices::Column::Id.eq(bill.id))
            .filter(purchase_invoices::Column::PaidAmount.eq(bill.paid_amount))
            .exec(&txn)
            .await
            .map_err(payment_db_err)?;

        if updated.rows_affected != 1 {
            return Err(PaymentError::ConcurrentModification);
        }

        audit::record(
            &txn,
            entity::PURCHASE_PAYMENT,
            Some(payment.id),
            action::CREATE,
            json!({
                "purchase_invoice_id": bill.id,
                "amount": amount,
                "balance_due": outcome.balance_due,
                "payment_status": outcome.status.as_str(),
            }),
        )
        .await
        .map_err(payment_db_err)?;

        txn.commit().await.map_err(payment_db_err)?;

        info!(
            purchase_invoice_id = %bill.id,
            amount = %amount,
            status = %outcome.status,
            "Supplier payment recorded"
        );
        Ok(payment)
    }
}
