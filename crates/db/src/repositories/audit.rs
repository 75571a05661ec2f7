//! Audit log writes.
//!
//! Every write path appends one row inside its own transaction, so the audit
//! entry commits or rolls back together with the change it describes.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryOrder,
    QuerySelect, Set,
};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::audit_logs;

/// Audited entity names.
pub mod entity {
    /// Purchase order line item.
    pub const PO_LINE_ITEM: &str = "POLineItem";
    /// Purchase order.
    pub const PURCHASE_ORDER: &str = "PurchaseOrder";
    /// Sales invoice.
    pub const INVOICE: &str = "Invoice";
    /// Payment received.
    pub const PAYMENT: &str = "Payment";
    /// Supplier invoice.
    pub const PURCHASE_INVOICE: &str = "PurchaseInvoice";
    /// Payment made to a supplier.
    pub const PURCHASE_PAYMENT: &str = "PurchasePayment";
    /// Credit note.
    pub const CREDIT_NOTE: &str = "CreditNote";
    /// Trading party.
    pub const PARTY: &str = "Party";
}

/// Audited actions.
pub mod action {
    /// Row created.
    pub const CREATE: &str = "CREATE";
    /// Status changed manually.
    pub const UPDATE_STATUS: &str = "UPDATE_STATUS";
    /// Material received.
    pub const INWARD: &str = "INWARD";
    /// Material dispatched.
    pub const OUTWARD: &str = "OUTWARD";
    /// Invoices settled in bulk.
    pub const BULK_MARK_PAID: &str = "BULK_MARK_PAID";
    /// Credit note applied to an invoice.
    pub const ADJUST: &str = "ADJUST";
    /// Credit note withdrawn.
    pub const CANCEL: &str = "CANCEL";
}

/// Appends an audit row inside `txn`.
pub(crate) async fn record(
    txn: &DatabaseTransaction,
    entity: &str,
    entity_id: Option<Uuid>,
    action: &str,
    details: Value,
) -> Result<(), DbErr> {
    let row = audit_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        entity: Set(entity.to_string()),
        entity_id: Set(entity_id),
        action: Set(action.to_string()),
        details: Set(details),
        created_at: Set(Utc::now().into()),
    };
    row.insert(txn).await?;
    Ok(())
}

/// Audit log reader.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists audit rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_recent(&self, limit: u64) -> Result<Vec<audit_logs::Model>, DbErr> {
        audit_logs::Entity::find()
            .order_by_desc(audit_logs::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }
}
