//! Party statement assembly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use tally_core::statement::{
    DateRange, EntryKind, PartyStatement, PartySummary, StatementError, StatementLine,
    StatementService,
};

use crate::entities::{
    credit_notes, invoices, parties, payments, purchase_invoices, purchase_payments,
    sea_orm_active_enums::{CreditNoteStatus, InvoiceStatus, PaymentRecordStatus},
};

fn db_err(e: DbErr) -> StatementError {
    StatementError::Database(e.to_string())
}

/// Statement repository.
#[derive(Debug, Clone)]
pub struct StatementRepository {
    db: DatabaseConnection,
}

impl StatementRepository {
    /// Creates a new statement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the statement of a party over an optional inclusive window.
    ///
    /// Returns `Ok(None)` for an unknown party. The opening balance comes
    /// from the party master and is not adjusted for documents before `from`.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::InvalidDateRange` if `from > to`, or
    /// `StatementError::Database` if a query fails.
    pub async fn get_party_statement(
        &self,
        party_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Option<PartyStatement>, StatementError> {
        let range = DateRange::new(from, to);
        StatementService::validate_range(&range)?;

        let Some(party) = parties::Entity::find_by_id(party_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let lines = self.collect_lines(party_id).await.map_err(db_err)?;
        let opening =
            StatementService::opening_balance(party.receivable_balance, party.payable_balance);
        let summary = PartySummary {
            id: party.id,
            name: party.name,
            gstin: party.gstin,
            kind: party.kind.into(),
        };

        Ok(Some(StatementService::build(summary, opening, lines, &range)))
    }

    async fn collect_lines(&self, party_id: Uuid) -> Result<Vec<StatementLine>, DbErr> {
        let mut lines = Vec::new();

        let sales = invoices::Entity::find()
            .filter(invoices::Column::PartyId.eq(party_id))
            .filter(invoices::Column::Status.ne(InvoiceStatus::Cancelled))
            .all(&self.db)
            .await?;
        lines.extend(sales.into_iter().map(|inv| StatementLine {
            id: inv.id,
            date: inv.invoice_date,
            kind: EntryKind::Invoice,
            description: format!("Sales invoice {}", inv.invoice_number),
            reference: inv.invoice_number,
            debit: inv.total_amount,
            credit: Decimal::ZERO,
        }));

        let receipts = payments::Entity::find()
            .find_also_related(invoices::Entity)
            .filter(invoices::Column::PartyId.eq(party_id))
            .filter(payments::Column::Status.eq(PaymentRecordStatus::Received))
            .all(&self.db)
            .await?;
        lines.extend(receipts.into_iter().map(|(payment, invoice)| {
            let invoice_number = invoice.map(|i| i.invoice_number).unwrap_or_default();
            StatementLine {
                id: payment.id,
                date: payment.payment_date,
                kind: EntryKind::Payment,
                description: format!("Payment against {invoice_number}"),
                reference: payment.reference.unwrap_or(invoice_number),
                debit: Decimal::ZERO,
                credit: payment.amount,
            }
        }));

        let bills = purchase_invoices::Entity::find()
            .filter(purchase_invoices::Column::PartyId.eq(party_id))
            .all(&self.db)
            .await?;
        lines.extend(bills.into_iter().map(|bill| StatementLine {
            id: bill.id,
            date: bill.invoice_date,
            kind: EntryKind::PurchaseInvoice,
            description: format!("Purchase invoice {}", bill.supplier_invoice_number),
            reference: bill.supplier_invoice_number,
            debit: Decimal::ZERO,
            credit: bill.total_amount,
        }));

        let supplier_payments = purchase_payments::Entity::find()
            .find_also_related(purchase_invoices::Entity)
            .filter(purchase_invoices::Column::PartyId.eq(party_id))
            .all(&self.db)
            .await?;
        lines.extend(supplier_payments.into_iter().map(|(payment, bill)| {
            let bill_number = bill.map(|b| b.supplier_invoice_number).unwrap_or_default();
            StatementLine {
                id: payment.id,
                date: payment.payment_date,
                kind: EntryKind::SupplierPayment,
                description: format!("Payment for {bill_number}"),
                reference: payment.reference.unwrap_or(bill_number),
                debit: payment.amount,
                credit: Decimal::ZERO,
            }
        }));

        let notes = credit_notes::Entity::find()
            .filter(credit_notes::Column::PartyId.eq(party_id))
            .filter(credit_notes::Column::Status.ne(CreditNoteStatus::Cancelled))
            .all(&self.db)
            .await?;
        lines.extend(notes.into_iter().map(|note| StatementLine {
            id: note.id,
            date: note.credit_note_date,
            kind: EntryKind::CreditNote,
            description: note
                .reason
                .unwrap_or_else(|| format!("Credit note {}", note.credit_note_number)),
            reference: note.credit_note_number,
            debit: Decimal::ZERO,
            credit: note.total_amount,
        }));

        Ok(lines)
    }
}
