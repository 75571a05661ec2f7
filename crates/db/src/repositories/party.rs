//! Party repository for trading partners.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use tally_shared::AppError;
use tally_shared::types::round_money;
use uuid::Uuid;

use super::audit::{self, action, entity};
use crate::entities::{parties, sea_orm_active_enums::PartyKind};

/// Error types for party operations.
#[derive(Debug, thiserror::Error)]
pub enum PartyError {
    /// Party not found.
    #[error("Party not found: {0}")]
    NotFound(Uuid),

    /// Name is required.
    #[error("Party name is required")]
    NameRequired,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PartyError> for AppError {
    fn from(err: PartyError) -> Self {
        match err {
            PartyError::NotFound(_) => Self::NotFound(err.to_string()),
            PartyError::NameRequired => Self::Validation(err.to_string()),
            PartyError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a party.
#[derive(Debug, Clone)]
pub struct CreatePartyInput {
    /// Display name.
    pub name: String,
    /// GST identification number.
    pub gstin: Option<String>,
    /// Customer, supplier or both.
    pub kind: PartyKind,
    /// Opening receivable balance.
    pub receivable_balance: Decimal,
    /// Opening payable balance.
    pub payable_balance: Decimal,
}

/// Party repository.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    db: DatabaseConnection,
}

impl PartyRepository {
    /// Creates a new party repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a party with its opening balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create_party(&self, input: CreatePartyInput) -> Result<parties::Model, PartyError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(PartyError::NameRequired);
        }

        let txn = self.db.begin().await?;

        let party = parties::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            gstin: Set(input.gstin.filter(|g| !g.trim().is_empty())),
            kind: Set(input.kind),
            receivable_balance: Set(round_money(input.receivable_balance)),
            payable_balance: Set(round_money(input.payable_balance)),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        audit::record(
            &txn,
            entity::PARTY,
            Some(party.id),
            action::CREATE,
            json!({ "name": party.name, "kind": party.kind }),
        )
        .await?;

        txn.commit().await?;
        Ok(party)
    }

    /// Finds a party by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the party does not exist or the query fails.
    pub async fn get_party(&self, party_id: Uuid) -> Result<parties::Model, PartyError> {
        parties::Entity::find_by_id(party_id)
            .one(&self.db)
            .await?
            .ok_or(PartyError::NotFound(party_id))
    }

    /// Lists all parties by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_parties(&self) -> Result<Vec<parties::Model>, PartyError> {
        let rows = parties::Entity::find()
            .order_by_asc(parties::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}
