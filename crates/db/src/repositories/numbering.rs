//! Document number lookup and unique-violation detection.

use sea_orm::{
    ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr,
};

use crate::entities::{credit_notes, invoices};

/// Greatest invoice number issued under `prefix`.
pub(crate) async fn last_invoice_number(
    txn: &DatabaseTransaction,
    prefix: &str,
) -> Result<Option<String>, DbErr> {
    let last = invoices::Entity::find()
        .select_only()
        .column(invoices::Column::InvoiceNumber)
        .filter(invoices::Column::InvoiceNumber.starts_with(prefix))
        .order_by_desc(invoices::Column::InvoiceNumber)
        .limit(1)
        .into_tuple::<String>()
        .one(txn)
        .await?;
    Ok(last)
}

/// Greatest credit note number issued under `prefix`.
pub(crate) async fn last_credit_note_number(
    txn: &DatabaseTransaction,
    prefix: &str,
) -> Result<Option<String>, DbErr> {
    let last = credit_notes::Entity::find()
        .select_only()
        .column(credit_notes::Column::CreditNoteNumber)
        .filter(credit_notes::Column::CreditNoteNumber.starts_with(prefix))
        .order_by_desc(credit_notes::Column::CreditNoteNumber)
        .limit(1)
        .into_tuple::<String>()
        .one(txn)
        .await?;
    Ok(last)
}

/// True if the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
