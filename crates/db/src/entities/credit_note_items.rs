//! `SeaORM` Entity for credit_note_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_note_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub credit_note_id: Uuid,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((16, 3)))")]
    pub qty: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::credit_notes::Entity",
        from = "Column::CreditNoteId",
        to = "super::credit_notes::Column::Id"
    )]
    CreditNotes,
}

impl Related<super::credit_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
