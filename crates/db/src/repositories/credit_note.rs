//! Credit note repository: issuance, one-time adjustment against an invoice
//! and cancellation.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use tally_core::credit_note::{
    Adjustment, CreditNoteError, CreditNoteItemInput, CreditNoteService, CreditTarget,
    PreparedCreditNote,
};
use tally_core::numbering::{DocumentKind, NumberingError, next_number};
use tally_core::payment::PaymentOutcome;
use tally_shared::config::BillingConfig;

use super::audit::{self, action, entity};
use super::numbering::{is_unique_violation, last_credit_note_number};
use super::payment::update_invoice_settlement;
use crate::entities::{
    credit_note_items, credit_notes, invoices, parties, sea_orm_active_enums::CreditNoteStatus,
};

fn db_err(e: DbErr) -> CreditNoteError {
    CreditNoteError::Database(e.to_string())
}

/// Input for issuing a credit note.
#[derive(Debug, Clone)]
pub struct CreateCreditNoteInput {
    /// Party the credit is issued to.
    pub party_id: Uuid,
    /// Credit note date.
    pub credit_note_date: NaiveDate,
    /// Reason for the credit.
    pub reason: Option<String>,
    /// Credited items.
    pub items: Vec<CreditNoteItemInput>,
}

/// A credit note with its items.
#[derive(Debug, Clone, Serialize)]
pub struct CreditNoteWithItems {
    /// Credit note row.
    pub credit_note: credit_notes::Model,
    /// Item rows.
    pub items: Vec<credit_note_items::Model>,
}

/// Credit note repository.
#[derive(Debug, Clone)]
pub struct CreditNoteRepository {
    db: DatabaseConnection,
    billing: BillingConfig,
}

impl CreditNoteRepository {
    /// Creates a new credit note repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, billing: BillingConfig) -> Self {
        Self { db, billing }
    }

    /// Issues a `PENDING` credit note numbered `CN-NNN`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad items, `CreditNoteError::PartyNotFound`,
    /// or `CreditNoteError::Numbering` once number allocation retries run out.
    pub async fn create_credit_note(
        &self,
        input: CreateCreditNoteInput,
    ) -> Result<credit_notes::Model, CreditNoteError> {
        let prepared = CreditNoteService::prepare(&input.items).inspect_err(|e| {
            warn!(party_id = %input.party_id, error = %e, "Credit note rejected");
        })?;

        let attempts = self.billing.number_retry_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.try_create_credit_note(&input, &prepared).await {
                Err(CreditNoteError::Numbering(e)) if e.is_retryable() && attempt < attempts => {
                    warn!(party_id = %input.party_id, attempt, "Credit note number taken, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
                Ok(note) => {
                    info!(
                        credit_note_id = %note.id,
                        credit_note_number = %note.credit_note_number,
                        total = %note.total_amount,
                        "Credit note created"
                    );
                    return Ok(note);
                }
            }
        }
    }

    async fn try_create_credit_note(
        &self,
        input: &CreateCreditNoteInput,
        prepared: &PreparedCreditNote,
    ) -> Result<credit_notes::Model, CreditNoteError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        parties::Entity::find_by_id(input.party_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(CreditNoteError::PartyNotFound(input.party_id))?;

        let prefix = &self.billing.credit_note_prefix;
        let last = last_credit_note_number(&txn, prefix)
            .await
            .map_err(db_err)?;
        let number = next_number(prefix, last.as_deref());

        let now = Utc::now();
        let note_id = Uuid::new_v4();
        let inserted = credit_notes::ActiveModel {
            id: Set(note_id),
            credit_note_number: Set(number),
            party_id: Set(input.party_id),
            credit_note_date: Set(input.credit_note_date),
            total_amount: Set(prepared.total),
            reason: Set(input.reason.clone()),
            status: Set(CreditNoteStatus::Pending),
            adjusted_invoice_id: Set(None),
            applied_amount: Set(None),
            adjusted_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await;

        let note = match inserted {
            Ok(note) => note,
            Err(e) if is_unique_violation(&e) => {
                return Err(NumberingError::AlreadyExists(DocumentKind::CreditNote).into());
            }
            Err(e) => return Err(db_err(e)),
        };

        for item in &prepared.items {
            credit_note_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                credit_note_id: Set(note_id),
                description: Set(item.description.clone()),
                qty: Set(item.qty),
                rate: Set(item.rate),
                amount: Set(item.amount),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }

        audit::record(
            &txn,
            entity::CREDIT_NOTE,
            Some(note_id),
            action::CREATE,
            json!({
                "credit_note_number": note.credit_note_number,
                "party_id": input.party_id,
                "total_amount": note.total_amount,
            }),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(note)
    }

    /// Finds a credit note with its items.
    ///
    /// # Errors
    ///
    /// Returns `CreditNoteError::NotFound` if it does not exist.
    pub async fn get_credit_note(
        &self,
        credit_note_id: Uuid,
    ) -> Result<CreditNoteWithItems, CreditNoteError> {
        let credit_note = credit_notes::Entity::find_by_id(credit_note_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(CreditNoteError::NotFound(credit_note_id))?;

        let items = credit_note_items::Entity::find()
            .filter(credit_note_items::Column::CreditNoteId.eq(credit_note_id))
            .order_by_asc(credit_note_items::Column::Description)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(CreditNoteWithItems { credit_note, items })
    }

    /// Applies a pending credit note to one invoice of the same party.
    ///
    /// Both rows change in one transaction or neither does. Credit beyond the
    /// invoice balance is dropped, not carried forward.
    ///
    /// # Errors
    ///
    /// Returns `CreditNoteError::AlreadyAdjusted` for a second adjustment,
    /// `CreditNoteError::Cancelled`, `CreditNoteError::PartyMismatch`, the
    /// not-found variants, or `CreditNoteError::ConcurrentModification`.
    pub async fn adjust_credit_note_against_invoice(
        &self,
        credit_note_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Adjustment, CreditNoteError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let note = credit_notes::Entity::find_by_id(credit_note_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(CreditNoteError::NotFound(credit_note_id))?;

        let invoice = invoices::Entity::find_by_id(invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(CreditNoteError::InvoiceNotFound(invoice_id))?;

        let target = CreditTarget {
            invoice_id: invoice.id,
            party_id: invoice.party_id,
            status: invoice.status.into(),
            paid_amount: invoice.paid_amount,
            balance_due: invoice.balance_due,
        };

        let adjustment =
            CreditNoteService::adjust(note.status.into(), note.party_id, note.total_amount, &target)
                .inspect_err(|e| {
                    warn!(
                        credit_note_id = %credit_note_id,
                        invoice_id = %invoice_id,
                        error = %e,
                        "Credit note adjustment rejected"
                    );
                })?;

        if adjustment.excess > rust_decimal::Decimal::ZERO {
            warn!(
                credit_note_id = %credit_note_id,
                invoice_id = %invoice_id,
                excess = %adjustment.excess,
                "Credit exceeds invoice balance, excess dropped"
            );
        }

        let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
        let claimed = credit_notes::Entity::update_many()
            .col_expr(
                credit_notes::Column::Status,
                Expr::value(CreditNoteStatus::Adjusted),
            )
            .col_expr(credit_notes::Column::AdjustedInvoiceId, Expr::value(invoice.id))
            .col_expr(credit_notes::Column::AppliedAmount, Expr::value(adjustment.applied))
            .col_expr(credit_notes::Column::AdjustedAt, Expr::value(now))
            .col_expr(credit_notes::Column::UpdatedAt, Expr::value(now))
            .filter(credit_notes::Column::Id.eq(note.id))
            .filter(credit_notes::Column::Status.eq(CreditNoteStatus::Pending))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if claimed.rows_affected != 1 {
            return Err(CreditNoteError::ConcurrentModification);
        }

        let outcome = PaymentOutcome {
            paid_amount: adjustment.paid_amount,
            balance_due: adjustment.balance_due,
            status: adjustment.status,
        };
        if !update_invoice_settlement(&txn, invoice.id, invoice.paid_amount, &outcome)
            .await
            .map_err(db_err)?
        {
            return Err(CreditNoteError::ConcurrentModification);
        }

        audit::record(
            &txn,
            entity::CREDIT_NOTE,
            Some(note.id),
            action::ADJUST,
            json!({
                "invoice_id": invoice.id,
                "applied_amount": adjustment.applied,
                "excess": adjustment.excess,
                "balance_due": adjustment.balance_due,
                "invoice_status": adjustment.status.as_str(),
            }),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            credit_note_id = %note.id,
            invoice_id = %invoice.id,
            applied = %adjustment.applied,
            "Credit note adjusted"
        );
        Ok(adjustment)
    }

    /// Cancels a pending credit note.
    ///
    /// # Errors
    ///
    /// Returns `CreditNoteError::NotFound` or
    /// `CreditNoteError::InvalidCancellation` if the note is not `PENDING`.
    pub async fn cancel_credit_note(
        &self,
        credit_note_id: Uuid,
    ) -> Result<credit_notes::Model, CreditNoteError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let note = credit_notes::Entity::find_by_id(credit_note_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(CreditNoteError::NotFound(credit_note_id))?;

        let next = CreditNoteService::cancel(note.status.into())?;

        let mut active: credit_notes::ActiveModel = note.into();
        active.status = Set(next.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;

        audit::record(
            &txn,
            entity::CREDIT_NOTE,
            Some(credit_note_id),
            action::CANCEL,
            json!({ "credit_note_number": updated.credit_note_number }),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(credit_note_id = %credit_note_id, "Credit note cancelled");
        Ok(updated)
    }
}
