//! `SeaORM` Entity for credit_notes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CreditNoteStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_notes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub credit_note_number: String,
    pub party_id: Uuid,
    pub credit_note_date: Date,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub total_amount: Decimal,
    pub reason: Option<String>,
    pub status: CreditNoteStatus,
    pub adjusted_invoice_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))", nullable)]
    pub applied_amount: Option<Decimal>,
    pub adjusted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::PartyId",
        to = "super::parties::Column::Id"
    )]
    Parties,
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::AdjustedInvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
    #[sea_orm(has_many = "super::credit_note_items::Entity")]
    CreditNoteItems,
}

impl Related<super::parties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parties.def()
    }
}

impl Related<super::credit_note_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditNoteItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
