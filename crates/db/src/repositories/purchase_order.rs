//! Purchase order repository: order intake, gate passes and the
//! dispatched-but-uninvoiced view that drives invoicing.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use tally_core::quantity::{LineItemQuantities, PurchaseOrderStatus as CorePoStatus, QuantityError};
use tally_shared::AppError;

use super::audit::{self, action, entity};
use super::numbering::is_unique_violation;
use crate::entities::{
    invoice_line_items, invoices, parties, po_line_items, purchase_orders,
    sea_orm_active_enums::{InvoiceStatus, PurchaseOrderStatus},
};

/// Error types for purchase order operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseOrderError {
    /// Purchase order not found.
    #[error("Purchase order not found: {0}")]
    NotFound(Uuid),

    /// Line item not found.
    #[error("Line item not found: {0}")]
    LineItemNotFound(Uuid),

    /// Party not found.
    #[error("Party not found: {0}")]
    PartyNotFound(Uuid),

    /// Purchase order has no line items.
    #[error("Purchase order must have at least one line item")]
    NoLineItems,

    /// A line item failed validation.
    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    /// Purchase order is cancelled.
    #[error("Purchase order is cancelled: {0}")]
    Cancelled(Uuid),

    /// PO number already used.
    #[error("Purchase order number already exists: {0}")]
    Duplicate(String),

    /// Quantity rule violated.
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PurchaseOrderError> for AppError {
    fn from(err: PurchaseOrderError) -> Self {
        match err {
            PurchaseOrderError::NotFound(_)
            | PurchaseOrderError::LineItemNotFound(_)
            | PurchaseOrderError::PartyNotFound(_) => Self::NotFound(err.to_string()),
            PurchaseOrderError::NoLineItems | PurchaseOrderError::InvalidLineItem(_) => {
                Self::Validation(err.to_string())
            }
            PurchaseOrderError::Cancelled(_) => Self::BusinessRule(err.to_string()),
            PurchaseOrderError::Duplicate(_) => Self::Conflict(err.to_string()),
            PurchaseOrderError::Quantity(e) => e.into(),
            PurchaseOrderError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for one purchase order line.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    /// Customer part number.
    pub part_number: String,
    /// Free-text description.
    pub description: String,
    /// Unit of measure.
    pub unit: String,
    /// Agreed unit rate.
    pub rate: Decimal,
    /// Ordered quantity.
    pub qty_ordered: Decimal,
}

/// Input for creating a purchase order.
#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderInput {
    /// Customer's PO number.
    pub po_number: String,
    /// Ordering party.
    pub party_id: Uuid,
    /// PO date.
    pub po_date: NaiveDate,
    /// Requested delivery date.
    pub delivery_date: Option<NaiveDate>,
    /// Lines on the order.
    pub line_items: Vec<NewLineItem>,
}

/// A purchase order with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderWithLines {
    /// Purchase order row.
    pub purchase_order: purchase_orders::Model,
    /// Line item rows.
    pub line_items: Vec<po_line_items::Model>,
}

/// A line item with its derived balances.
#[derive(Debug, Clone, Serialize)]
pub struct LineItemWithBalance {
    /// Line item row.
    #[serde(flatten)]
    pub line: po_line_items::Model,
    /// Dispatched but not yet invoiced.
    pub invoiceable_qty: Decimal,
    /// Received but not yet dispatched.
    pub dispatch_balance: Decimal,
    /// Still to be received.
    pub receive_balance: Decimal,
}

/// A purchase order that has dispatched material.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderWithDispatches {
    /// Purchase order row.
    pub purchase_order: purchase_orders::Model,
    /// Name of the ordering party.
    pub party_name: String,
    /// Every line of the order with balances.
    pub line_items: Vec<LineItemWithBalance>,
}

/// Sums invoiced quantities per line item, ignoring cancelled invoices.
pub(crate) async fn invoiced_quantities<C: ConnectionTrait>(
    conn: &C,
    line_item_ids: &[Uuid],
) -> Result<HashMap<Uuid, Decimal>, DbErr> {
    if line_item_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, Decimal)> = invoice_line_items::Entity::find()
        .select_only()
        .column(invoice_line_items::Column::PoLineItemId)
        .column(invoice_line_items::Column::Qty)
        .join(
            sea_orm::JoinType::InnerJoin,
            invoice_line_items::Relation::Invoices.def(),
        )
        .filter(invoice_line_items::Column::PoLineItemId.is_in(line_item_ids.iter().copied()))
        .filter(invoices::Column::Status.ne(InvoiceStatus::Cancelled))
        .into_tuple()
        .all(conn)
        .await?;

    let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
    for (line_item_id, qty) in rows {
        *totals.entry(line_item_id).or_default() += qty;
    }
    Ok(totals)
}

/// Purchase order repository.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    db: DatabaseConnection,
}

impl PurchaseOrderRepository {
    /// Creates a new purchase order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a purchase order with its line items.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the party does not exist or the
    /// PO number is already used.
    pub async fn create_purchase_order(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> Result<PurchaseOrderWithLines, PurchaseOrderError> {
        let po_number = input.po_number.trim().to_string();
        if po_number.is_empty() {
            return Err(PurchaseOrderError::InvalidLineItem(
                "PO number is required".to_string(),
            ));
        }
        validate_new_lines(&input.line_items)?;

        let txn = self.db.begin().await?;

        parties::Entity::find_by_id(input.party_id)
            .one(&txn)
            .await?
            .ok_or(PurchaseOrderError::PartyNotFound(input.party_id))?;

        let now = Utc::now();
        let po_id = Uuid::new_v4();
        let inserted = purchase_orders::ActiveModel {
            id: Set(po_id),
            po_number: Set(po_number.clone()),
            party_id: Set(input.party_id),
            po_date: Set(input.po_date),
            delivery_date: Set(input.delivery_date),
            status: Set(PurchaseOrderStatus::Open),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await;

        let purchase_order = match inserted {
            Ok(po) => po,
            Err(e) if is_unique_violation(&e) => {
                return Err(PurchaseOrderError::Duplicate(po_number));
            }
            Err(e) => return Err(e.into()),
        };

        let mut line_items = Vec::with_capacity(input.line_items.len());
        for item in input.line_items {
            let line = po_line_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_order_id: Set(po_id),
                part_number: Set(item.part_number.trim().to_string()),
                description: Set(item.description),
                unit: Set(item.unit),
                rate: Set(item.rate),
                qty_ordered: Set(item.qty_ordered),
                qty_received: Set(Decimal::ZERO),
                qty_dispatched: Set(Decimal::ZERO),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
            line_items.push(line);
        }

        audit::record(
            &txn,
            entity::PURCHASE_ORDER,
            Some(po_id),
            action::CREATE,
            json!({ "po_number": purchase_order.po_number, "lines": line_items.len() }),
        )
        .await?;

        txn.commit().await?;

        info!(purchase_order_id = %po_id, po_number = %purchase_order.po_number, "Purchase order created");

        Ok(PurchaseOrderWithLines {
            purchase_order,
            line_items,
        })
    }

    /// Finds a purchase order with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the query fails.
    pub async fn get_purchase_order(
        &self,
        po_id: Uuid,
    ) -> Result<PurchaseOrderWithLines, PurchaseOrderError> {
        let purchase_order = purchase_orders::Entity::find_by_id(po_id)
            .one(&self.db)
            .await?
            .ok_or(PurchaseOrderError::NotFound(po_id))?;

        let line_items = po_line_items::Entity::find()
            .filter(po_line_items::Column::PurchaseOrderId.eq(po_id))
            .order_by_asc(po_line_items::Column::PartNumber)
            .all(&self.db)
            .await?;

        Ok(PurchaseOrderWithLines {
            purchase_order,
            line_items,
        })
    }

    /// Lists non-cancelled purchase orders with at least one line that is
    /// dispatched but not yet invoiced. Every line of a listed order carries
    /// its live invoiceable quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or stored quantities are corrupt.
    pub async fn get_pos_with_dispatches(
        &self,
    ) -> Result<Vec<PurchaseOrderWithDispatches>, PurchaseOrderError> {
        let dispatched_po_ids: Vec<Uuid> = po_line_items::Entity::find()
            .select_only()
            .column(po_line_items::Column::PurchaseOrderId)
            .filter(po_line_items::Column::QtyDispatched.gt(Decimal::ZERO))
            .into_tuple()
            .all(&self.db)
            .await?;

        let po_ids: HashSet<Uuid> = dispatched_po_ids.into_iter().collect();
        if po_ids.is_empty() {
            return Ok(Vec::new());
        }

        let orders = purchase_orders::Entity::find()
            .find_also_related(parties::Entity)
            .filter(purchase_orders::Column::Id.is_in(po_ids.iter().copied()))
            .filter(purchase_orders::Column::Status.ne(PurchaseOrderStatus::Cancelled))
            .order_by_asc(purchase_orders::Column::PoDate)
            .order_by_asc(purchase_orders::Column::PoNumber)
            .all(&self.db)
            .await?;

        let lines = po_line_items::Entity::find()
            .filter(
                po_line_items::Column::PurchaseOrderId
                    .is_in(orders.iter().map(|(po, _)| po.id)),
            )
            .order_by_asc(po_line_items::Column::PartNumber)
            .all(&self.db)
            .await?;

        let line_ids: Vec<Uuid> = lines.iter().map(|l| l.id).collect();
        let invoiced = invoiced_quantities(&self.db, &line_ids).await?;

        let mut lines_by_po: HashMap<Uuid, Vec<LineItemWithBalance>> = HashMap::new();
        for line in lines {
            let quantities = line.quantities();
            let invoiced_qty = invoiced.get(&line.id).copied().unwrap_or_default();
            let invoiceable_qty = quantities.invoiceable_qty(invoiced_qty)?;
            lines_by_po
                .entry(line.purchase_order_id)
                .or_default()
                .push(LineItemWithBalance {
                    invoiceable_qty,
                    dispatch_balance: quantities.dispatch_balance(),
                    receive_balance: quantities.receive_balance(),
                    line,
                });
        }

        Ok(orders
            .into_iter()
            .map(|(purchase_order, party)| PurchaseOrderWithDispatches {
                line_items: lines_by_po.remove(&purchase_order.id).unwrap_or_default(),
                party_name: party.map(|p| p.name).unwrap_or_default(),
                purchase_order,
            })
            .filter(|po| {
                po.line_items
                    .iter()
                    .any(|l| l.invoiceable_qty > Decimal::ZERO)
            })
            .collect())
    }

    /// Records an inward gate pass against a line item.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist, its order is cancelled or
    /// the quantity exceeds the receive balance.
    pub async fn record_inward(
        &self,
        line_item_id: Uuid,
        qty: Decimal,
    ) -> Result<po_line_items::Model, PurchaseOrderError> {
        let txn = self.db.begin().await?;

        let (line, po) = lock_line_item(&txn, line_item_id).await?;
        let next = line.quantities().record_inward(qty).inspect_err(|e| {
            warn!(line_item_id = %line_item_id, error = %e, "Inward gate pass rejected");
        })?;

        let mut active: po_line_items::ActiveModel = line.into();
        active.qty_received = Set(next.received);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        audit::record(
            &txn,
            entity::PO_LINE_ITEM,
            Some(line_item_id),
            action::INWARD,
            json!({ "purchase_order_id": po.id, "qty": qty, "qty_received": next.received }),
        )
        .await?;

        txn.commit().await?;

        info!(line_item_id = %line_item_id, qty = %qty, "Inward gate pass recorded");
        Ok(updated)
    }

    /// Records an outward gate pass against a line item and rolls the order
    /// status forward.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist, its order is cancelled or
    /// the quantity exceeds the dispatch balance.
    pub async fn record_outward(
        &self,
        line_item_id: Uuid,
        qty: Decimal,
    ) -> Result<po_line_items::Model, PurchaseOrderError> {
        let txn = self.db.begin().await?;

        let (line, po) = lock_line_item(&txn, line_item_id).await?;
        let next = line.quantities().record_outward(qty).inspect_err(|e| {
            warn!(line_item_id = %line_item_id, error = %e, "Outward gate pass rejected");
        })?;

        let now = Utc::now();
        let mut active: po_line_items::ActiveModel = line.into();
        active.qty_dispatched = Set(next.dispatched);
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await?;

        let siblings: Vec<LineItemQuantities> = po_line_items::Entity::find()
            .filter(po_line_items::Column::PurchaseOrderId.eq(po.id))
            .all(&txn)
            .await?
            .iter()
            .map(po_line_items::Model::quantities)
            .collect();

        let current: CorePoStatus = po.status.into();
        let rolled = CorePoStatus::after_dispatch(current, &siblings);
        if rolled != current {
            let mut active_po: purchase_orders::ActiveModel = po.clone().into();
            active_po.status = Set(rolled.into());
            active_po.updated_at = Set(now.into());
            active_po.update(&txn).await?;
        }

        audit::record(
            &txn,
            entity::PO_LINE_ITEM,
            Some(line_item_id),
            action::OUTWARD,
            json!({
                "purchase_order_id": po.id,
                "qty": qty,
                "qty_dispatched": next.dispatched,
                "po_status": rolled.as_str(),
            }),
        )
        .await?;

        txn.commit().await?;

        info!(
            line_item_id = %line_item_id,
            qty = %qty,
            po_status = %rolled,
            "Outward gate pass recorded"
        );
        Ok(updated)
    }
}

fn validate_new_lines(lines: &[NewLineItem]) -> Result<(), PurchaseOrderError> {
    if lines.is_empty() {
        return Err(PurchaseOrderError::NoLineItems);
    }
    for line in lines {
        let part = line.part_number.trim();
        if part.is_empty() {
            return Err(PurchaseOrderError::InvalidLineItem(
                "part number is required".to_string(),
            ));
        }
        if line.qty_ordered <= Decimal::ZERO {
            return Err(PurchaseOrderError::InvalidLineItem(format!(
                "ordered quantity for part {part} must be greater than zero"
            )));
        }
        if line.rate < Decimal::ZERO {
            return Err(PurchaseOrderError::InvalidLineItem(format!(
                "rate for part {part} cannot be negative"
            )));
        }
    }
    Ok(())
}

/// Loads a line item under a row lock together with its order.
async fn lock_line_item(
    txn: &DatabaseTransaction,
    line_item_id: Uuid,
) -> Result<(po_line_items::Model, purchase_orders::Model), PurchaseOrderError> {
    let line = po_line_items::Entity::find_by_id(line_item_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(PurchaseOrderError::LineItemNotFound(line_item_id))?;

    let po = purchase_orders::Entity::find_by_id(line.purchase_order_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(PurchaseOrderError::NotFound(line.purchase_order_id))?;

    if po.status == PurchaseOrderStatus::Cancelled {
        return Err(PurchaseOrderError::Cancelled(po.id));
    }

    Ok((line, po))
}
