//! Invoice repository: issuance against dispatched quantities and manual
//! status overrides.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use tally_core::invoice::{
    GstRates, InvoiceError, InvoiceService, InvoiceStatus as CoreInvoiceStatus, LineAvailability,
    PreparedInvoice, RequestedLine,
};
use tally_core::numbering::{DocumentKind, NumberingError, invoice_prefix, next_number};
use tally_shared::config::BillingConfig;
use tally_shared::types::round_money;

use super::audit::{self, action, entity};
use super::numbering::{is_unique_violation, last_invoice_number};
use super::purchase_order::invoiced_quantities;
use crate::entities::{
    invoice_line_items, invoices, po_line_items, purchase_orders,
    sea_orm_active_enums::{InvoiceStatus, PurchaseOrderStatus},
};

fn db_err(e: DbErr) -> InvoiceError {
    InvoiceError::Database(e.to_string())
}

/// Input for issuing an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Purchase order being billed.
    pub purchase_order_id: Uuid,
    /// Invoice date; also selects the fiscal year of the number.
    pub invoice_date: NaiveDate,
    /// Free-text remarks.
    pub remarks: Option<String>,
    /// Requested lines.
    pub lines: Vec<RequestedLine>,
}

/// An invoice with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceWithLines {
    /// Invoice row.
    pub invoice: invoices::Model,
    /// Line rows.
    pub lines: Vec<invoice_line_items::Model>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
    billing: BillingConfig,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, billing: BillingConfig) -> Self {
        Self { db, billing }
    }

    /// Issues an invoice against a purchase order.
    ///
    /// Availability check, numbering and persistence run in one transaction.
    /// When another writer takes the same number first, the whole attempt is
    /// rolled back and retried up to `number_retry_attempts` times.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any requested line fails its checks,
    /// `InvoiceError::Numbering` if no number could be allocated, or
    /// `InvoiceError::Database` on persistence failures.
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<invoices::Model, InvoiceError> {
        let attempts = self.billing.number_retry_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.try_create_invoice(&input).await {
                Err(InvoiceError::Numbering(e)) if e.is_retryable() && attempt < attempts => {
                    warn!(
                        purchase_order_id = %input.purchase_order_id,
                        attempt,
                        "Invoice number taken, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => {
                    if !matches!(e, InvoiceError::Database(_)) {
                        warn!(
                            purchase_order_id = %input.purchase_order_id,
                            error = %e,
                            "Invoice rejected"
                        );
                    }
                    return Err(e);
                }
                Ok(invoice) => {
                    info!(
                        invoice_id = %invoice.id,
                        invoice_number = %invoice.invoice_number,
                        total = %invoice.total_amount,
                        "Invoice created"
                    );
                    return Ok(invoice);
                }
            }
        }
    }

    async fn try_create_invoice(
        &self,
        input: &CreateInvoiceInput,
    ) -> Result<invoices::Model, InvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let po = purchase_orders::Entity::find_by_id(input.purchase_order_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(InvoiceError::PurchaseOrderNotFound(input.purchase_order_id))?;

        if po.status == PurchaseOrderStatus::Cancelled {
            return Err(InvoiceError::PurchaseOrderCancelled(po.id));
        }

        let availability = load_availability(&txn, po.id).await?;
        let rates = GstRates::from_config(&self.billing);
        let prepared = InvoiceService::prepare(&input.lines, &availability, &rates)?;

        let prefix = invoice_prefix(&self.billing.invoice_prefix, input.invoice_date);
        let last = last_invoice_number(&txn, &prefix).await.map_err(db_err)?;
        let invoice_number = next_number(&prefix, last.as_deref());

        let invoice = insert_invoice(&txn, &po, input, invoice_number, &prepared).await?;

        audit::record(
            &txn,
            entity::INVOICE,
            Some(invoice.id),
            action::CREATE,
            json!({
                "invoice_number": invoice.invoice_number,
                "purchase_order_id": po.id,
                "total_amount": invoice.total_amount,
                "lines": prepared.lines.len(),
            }),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(invoice)
    }

    /// Finds an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvoiceNotFound` if it does not exist.
    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<InvoiceWithLines, InvoiceError> {
        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(InvoiceError::InvoiceNotFound(invoice_id))?;

        let lines = invoice_line_items::Entity::find()
            .filter(invoice_line_items::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(invoice_line_items::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(InvoiceWithLines { invoice, lines })
    }

    /// Lists invoices of a party, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::Database` if the query fails.
    pub async fn list_party_invoices(
        &self,
        party_id: Uuid,
    ) -> Result<Vec<invoices::Model>, InvoiceError> {
        invoices::Entity::find()
            .filter(invoices::Column::PartyId.eq(party_id))
            .order_by_desc(invoices::Column::InvoiceDate)
            .order_by_desc(invoices::Column::InvoiceNumber)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Overrides an invoice status, e.g. `DRAFT -> SENT` or forcing `PAID`.
    ///
    /// Payment rows and amounts are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvoiceNotFound` or
    /// `InvoiceError::InvalidStatusTransition`.
    pub async fn update_payment_status(
        &self,
        invoice_id: Uuid,
        status: CoreInvoiceStatus,
    ) -> Result<invoices::Model, InvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let invoice = invoices::Entity::find_by_id(invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(InvoiceError::InvoiceNotFound(invoice_id))?;

        let from: CoreInvoiceStatus = invoice.status.into();
        InvoiceService::validate_status_override(from, status, invoice.paid_amount).inspect_err(
            |e| warn!(invoice_id = %invoice_id, error = %e, "Status override rejected"),
        )?;

        if from == status {
            txn.commit().await.map_err(db_err)?;
            return Ok(invoice);
        }

        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;

        audit::record(
            &txn,
            entity::INVOICE,
            Some(invoice_id),
            action::UPDATE_STATUS,
            json!({ "from": from.as_str(), "to": status.as_str() }),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(invoice_id = %invoice_id, from = %from, to = %status, "Invoice status updated");
        Ok(updated)
    }
}

/// Reads every line of a purchase order under a row lock with the quantity
/// already invoiced against it.
async fn load_availability(
    txn: &DatabaseTransaction,
    po_id: Uuid,
) -> Result<Vec<LineAvailability>, InvoiceError> {
    let lines = po_line_items::Entity::find()
        .filter(po_line_items::Column::PurchaseOrderId.eq(po_id))
        .lock_exclusive()
        .all(txn)
        .await
        .map_err(db_err)?;

    let ids: Vec<Uuid> = lines.iter().map(|l| l.id).collect();
    let invoiced = invoiced_quantities(txn, &ids).await.map_err(db_err)?;

    Ok(lines
        .into_iter()
        .map(|line| LineAvailability {
            po_line_item_id: line.id,
            invoiced_qty: invoiced.get(&line.id).copied().unwrap_or_default(),
            quantities: line.quantities(),
            part_number: line.part_number,
        })
        .collect())
}

async fn insert_invoice(
    txn: &DatabaseTransaction,
    po: &purchase_orders::Model,
    input: &CreateInvoiceInput,
    invoice_number: String,
    prepared: &PreparedInvoice,
) -> Result<invoices::Model, InvoiceError> {
    let totals = prepared.totals.rounded();
    let now = Utc::now();
    let invoice_id = Uuid::new_v4();

    let inserted = invoices::ActiveModel {
        id: Set(invoice_id),
        invoice_number: Set(invoice_number),
        party_id: Set(po.party_id),
        purchase_order_id: Set(po.id),
        invoice_date: Set(input.invoice_date),
        subtotal: Set(totals.subtotal),
        cgst: Set(totals.cgst),
        sgst: Set(totals.sgst),
        igst: Set(totals.igst),
        total_amount: Set(totals.total),
        paid_amount: Set(rust_decimal::Decimal::ZERO),
        balance_due: Set(totals.total),
        remarks: Set(input.remarks.clone()),
        status: Set(InvoiceStatus::Draft),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(txn)
    .await;

    let invoice = match inserted {
        Ok(invoice) => invoice,
        Err(e) if is_unique_violation(&e) => {
            return Err(NumberingError::AlreadyExists(DocumentKind::Invoice).into());
        }
        Err(e) => return Err(db_err(e)),
    };

    for line in &prepared.lines {
        invoice_line_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            po_line_item_id: Set(line.po_line_item_id),
            qty: Set(line.qty),
            rate: Set(line.rate),
            amount: Set(round_money(line.amount)),
            created_at: Set(now.into()),
        }
        .insert(txn)
        .await
        .map_err(db_err)?;
    }

    Ok(invoice)
}
