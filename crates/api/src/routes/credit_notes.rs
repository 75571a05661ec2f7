//! Credit note routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, response};
use tally_core::credit_note::CreditNoteItemInput;
use tally_db::repositories::{CreateCreditNoteInput, CreditNoteRepository};

/// Creates the credit note routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/credit-notes", post(create_credit_note))
        .route("/credit-notes/{credit_note_id}", get(get_credit_note))
        .route("/credit-notes/{credit_note_id}/adjust", post(adjust_credit_note))
        .route("/credit-notes/{credit_note_id}/cancel", post(cancel_credit_note))
}

/// Request body for issuing a credit note.
#[derive(Debug, Deserialize)]
pub struct CreateCreditNoteRequest {
    /// Party credited.
    pub party_id: Uuid,
    /// Credit note date.
    pub credit_note_date: NaiveDate,
    /// Reason for the credit.
    pub reason: Option<String>,
    /// Credited items.
    pub items: Vec<CreditNoteItemInput>,
}

/// Request body for applying a credit note.
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    /// Invoice to apply the credit to.
    pub invoice_id: Uuid,
}

/// POST `/credit-notes` - Issue a credit note.
async fn create_credit_note(
    State(state): State<AppState>,
    Json(payload): Json<CreateCreditNoteRequest>,
) -> impl IntoResponse {
    let repo = CreditNoteRepository::new((*state.db).clone(), (*state.billing).clone());
    let input = CreateCreditNoteInput {
        party_id: payload.party_id,
        credit_note_date: payload.credit_note_date,
        reason: payload.reason,
        items: payload.items,
    };

    match repo.create_credit_note(input).await {
        Ok(note) => response::created(note.id),
        Err(e) => response::failure(e, "create_credit_note"),
    }
}

/// GET `/credit-notes/{credit_note_id}` - Credit note with its items.
async fn get_credit_note(
    State(state): State<AppState>,
    Path(credit_note_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CreditNoteRepository::new((*state.db).clone(), (*state.billing).clone());
    match repo.get_credit_note(credit_note_id).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => response::failure(e, "get_credit_note"),
    }
}

/// POST `/credit-notes/{credit_note_id}/adjust` - Apply to an invoice.
async fn adjust_credit_note(
    State(state): State<AppState>,
    Path(credit_note_id): Path<Uuid>,
    Json(payload): Json<AdjustRequest>,
) -> impl IntoResponse {
    let repo = CreditNoteRepository::new((*state.db).clone(), (*state.billing).clone());
    match repo
        .adjust_credit_note_against_invoice(credit_note_id, payload.invoice_id)
        .await
    {
        Ok(_) => response::ok(),
        Err(e) => response::failure(e, "adjust_credit_note_against_invoice"),
    }
}

/// POST `/credit-notes/{credit_note_id}/cancel` - Withdraw a pending note.
async fn cancel_credit_note(
    State(state): State<AppState>,
    Path(credit_note_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CreditNoteRepository::new((*state.db).clone(), (*state.billing).clone());
    match repo.cancel_credit_note(credit_note_id).await {
        Ok(_) => response::ok(),
        Err(e) => response::failure(e, "cancel_credit_note"),
    }
}
