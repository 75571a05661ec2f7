//! `SeaORM` Entity for po_line_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::quantity::LineItemQuantities;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "po_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub part_number: String,
    pub description: String,
    pub unit: String,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 3)))")]
    pub qty_ordered: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 3)))")]
    pub qty_received: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 3)))")]
    pub qty_dispatched: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Cumulative quantities of the line.
    #[must_use]
    pub const fn quantities(&self) -> LineItemQuantities {
        LineItemQuantities::new(self.qty_ordered, self.qty_received, self.qty_dispatched)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_orders::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_orders::Column::Id"
    )]
    PurchaseOrders,
    #[sea_orm(has_many = "super::invoice_line_items::Entity")]
    InvoiceLineItems,
}

impl Related<super::purchase_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrders.def()
    }
}

impl Related<super::invoice_line_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceLineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
