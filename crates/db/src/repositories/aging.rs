//! Receivable and payable aging reports.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use tally_core::aging::{AgingRow, AgingService, AgingSide, OutstandingDocument};

use crate::entities::{
    credit_notes, invoices, parties, payments, purchase_invoices,
    sea_orm_active_enums::{CreditNoteStatus, InvoiceStatus, PaymentRecordStatus, PaymentStatus},
};

/// Aging repository.
#[derive(Debug, Clone)]
pub struct AgingRepository {
    db: DatabaseConnection,
}

impl AgingRepository {
    /// Creates a new aging repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Aging for one side of the books, as of `as_of` or today.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn get_aging(
        &self,
        side: AgingSide,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<AgingRow>, DbErr> {
        match (side, as_of) {
            (AgingSide::Receivables, None) => self.get_receivables_aging().await,
            (AgingSide::Receivables, Some(on)) => self.get_receivables_aging_as_of(on).await,
            (AgingSide::Payables, None) => self.get_payables_aging().await,
            (AgingSide::Payables, Some(on)) => self.get_payables_aging_as_of(on).await,
        }
    }

    /// Receivables aged as of today.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn get_receivables_aging(&self) -> Result<Vec<AgingRow>, DbErr> {
        self.get_receivables_aging_as_of(Utc::now().date_naive()).await
    }

    /// Payables aged as of today.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn get_payables_aging(&self) -> Result<Vec<AgingRow>, DbErr> {
        self.get_payables_aging_as_of(Utc::now().date_naive()).await
    }

    /// Receivables aged as of `as_of`.
    ///
    /// Outstanding is recomputed from received payments and applied credit
    /// rather than read from `balance_due`.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn get_receivables_aging_as_of(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<AgingRow>, DbErr> {
        let open = invoices::Entity::find()
            .find_also_related(parties::Entity)
            .filter(invoices::Column::Status.is_not_in([InvoiceStatus::Paid, InvoiceStatus::Cancelled]))
            .all(&self.db)
            .await?;
        if open.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = open.iter().map(|(inv, _)| inv.id).collect();

        let received: Vec<(Uuid, Decimal)> = payments::Entity::find()
            .select_only()
            .column(payments::Column::InvoiceId)
            .column(payments::Column::Amount)
            .filter(payments::Column::InvoiceId.is_in(ids.iter().copied()))
            .filter(payments::Column::Status.eq(PaymentRecordStatus::Received))
            .into_tuple()
            .all(&self.db)
            .await?;

        let credited: Vec<(Option<Uuid>, Option<Decimal>)> = credit_notes::Entity::find()
            .select_only()
            .column(credit_notes::Column::AdjustedInvoiceId)
            .column(credit_notes::Column::AppliedAmount)
            .filter(credit_notes::Column::AdjustedInvoiceId.is_in(ids.iter().copied()))
            .filter(credit_notes::Column::Status.eq(CreditNoteStatus::Adjusted))
            .into_tuple()
            .all(&self.db)
            .await?;

        let received = sum_by_invoice(received);
        let credited = sum_by_invoice(
            credited
                .into_iter()
                .filter_map(|(id, amount)| Some((id?, amount.unwrap_or_default()))),
        );

        let documents: Vec<OutstandingDocument> = open
            .into_iter()
            .map(|(inv, party)| OutstandingDocument {
                party_id: inv.party_id,
                party_name: party.map(|p| p.name).unwrap_or_default(),
                date: inv.invoice_date,
                outstanding: AgingService::receivable_outstanding(
                    inv.total_amount,
                    received.get(&inv.id).copied().unwrap_or_default(),
                    credited.get(&inv.id).copied().unwrap_or_default(),
                ),
            })
            .collect();

        Ok(AgingService::build(&documents, as_of))
    }

    /// Payables aged as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn get_payables_aging_as_of(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<AgingRow>, DbErr> {
        let open = purchase_invoices::Entity::find()
            .find_also_related(parties::Entity)
            .filter(purchase_invoices::Column::PaymentStatus.ne(PaymentStatus::Paid))
            .all(&self.db)
            .await?;

        let documents: Vec<OutstandingDocument> = open
            .into_iter()
            .map(|(bill, party)| OutstandingDocument {
                party_id: bill.party_id,
                party_name: party.map(|p| p.name).unwrap_or_default(),
                date: bill.invoice_date,
                outstanding: bill.balance_due,
            })
            .collect();

        Ok(AgingService::build(&documents, as_of))
    }
}

fn sum_by_invoice(rows: impl IntoIterator<Item = (Uuid, Decimal)>) -> HashMap<Uuid, Decimal> {
    let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
    for (id, amount) in rows {
        *totals.entry(id).or_default() += amount;
    }
    totals
}
