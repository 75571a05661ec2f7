//! `SeaORM` Entity for invoice_line_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub po_line_item_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((16, 3)))")]
    pub qty: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
    #[sea_orm(
        belongs_to = "super::po_line_items::Entity",
        from = "Column::PoLineItemId",
        to = "super::po_line_items::Column::Id"
    )]
    PoLineItems,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::po_line_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PoLineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
