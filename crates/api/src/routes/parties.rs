//! Party master and statement routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, response};
use tally_core::statement::PartyKind as CorePartyKind;
use tally_db::repositories::{
    CreatePartyInput, InvoiceRepository, PartyRepository, StatementRepository,
};

/// Creates the party routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/parties", get(list_parties).post(create_party))
        .route("/parties/{party_id}", get(get_party))
        .route("/parties/{party_id}/invoices", get(list_party_invoices))
        .route("/parties/{party_id}/statement", get(get_party_statement))
}

/// Request body for creating a party.
#[derive(Debug, Deserialize)]
pub struct CreatePartyRequest {
    /// Display name.
    pub name: String,
    /// GST identification number.
    pub gstin: Option<String>,
    /// `customer`, `supplier` or `both`.
    pub kind: CorePartyKind,
    /// Opening receivable balance.
    #[serde(default)]
    pub receivable_balance: Decimal,
    /// Opening payable balance.
    #[serde(default)]
    pub payable_balance: Decimal,
}

/// Optional statement window.
#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    /// First date included.
    pub from: Option<NaiveDate>,
    /// Last date included.
    pub to: Option<NaiveDate>,
}

/// POST `/parties` - Create a party.
async fn create_party(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartyRequest>,
) -> impl IntoResponse {
    let repo = PartyRepository::new((*state.db).clone());
    let input = CreatePartyInput {
        name: payload.name,
        gstin: payload.gstin,
        kind: payload.kind.into(),
        receivable_balance: payload.receivable_balance,
        payable_balance: payload.payable_balance,
    };

    match repo.create_party(input).await {
        Ok(party) => {
            info!(party_id = %party.id, "Party created");
            response::created(party.id)
        }
        Err(e) => response::failure(e, "create_party"),
    }
}

/// GET `/parties` - List parties by name.
async fn list_parties(State(state): State<AppState>) -> impl IntoResponse {
    let repo = PartyRepository::new((*state.db).clone());
    match repo.list_parties().await {
        Ok(parties) => (StatusCode::OK, Json(parties)).into_response(),
        Err(e) => response::failure(e, "list_parties"),
    }
}

/// GET `/parties/{party_id}` - One party.
async fn get_party(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PartyRepository::new((*state.db).clone());
    match repo.get_party(party_id).await {
        Ok(party) => (StatusCode::OK, Json(party)).into_response(),
        Err(e) => response::failure(e, "get_party"),
    }
}

/// GET `/parties/{party_id}/invoices` - Sales invoices, newest first.
async fn list_party_invoices(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone(), (*state.billing).clone());
    match repo.list_party_invoices(party_id).await {
        Ok(invoices) => (StatusCode::OK, Json(invoices)).into_response(),
        Err(e) => response::failure(e, "list_party_invoices"),
    }
}

/// GET `/parties/{party_id}/statement` - Running-balance statement.
///
/// Answers `404` with a `null` body for an unknown party.
async fn get_party_statement(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    Query(query): Query<StatementQuery>,
) -> impl IntoResponse {
    let repo = StatementRepository::new((*state.db).clone());
    match repo.get_party_statement(party_id, query.from, query.to).await {
        Ok(Some(statement)) => (StatusCode::OK, Json(statement)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(Value::Null)).into_response(),
        Err(e) => response::failure(e, "get_party_statement"),
    }
}
