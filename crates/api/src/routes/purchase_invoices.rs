//! Supplier invoice routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, response};
use tally_db::repositories::{
    CreatePurchaseInvoiceInput, PurchaseInvoiceRepository, RecordPurchasePaymentInput,
};

/// Creates the purchase invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchase-invoices", post(create_purchase_invoice))
        .route(
            "/purchase-invoices/{purchase_invoice_id}/payments",
            post(record_purchase_payment),
        )
}

/// Request body for booking a supplier invoice.
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseInvoiceRequest {
    /// Supplier.
    pub party_id: Uuid,
    /// Supplier's invoice number.
    pub supplier_invoice_number: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Total including tax.
    pub total_amount: Decimal,
    /// Free-text remarks.
    pub remarks: Option<String>,
}

/// Request body for paying a supplier.
#[derive(Debug, Deserialize)]
pub struct RecordPurchasePaymentRequest {
    /// Amount paid.
    pub amount: Decimal,
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Payment mode.
    pub mode: Option<String>,
    /// Bank or cheque reference.
    pub reference: Option<String>,
    /// Free-text remarks.
    pub remarks: Option<String>,
}

/// POST `/purchase-invoices` - Book a supplier invoice.
async fn create_purchase_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseInvoiceRequest>,
) -> impl IntoResponse {
    let repo = PurchaseInvoiceRepository::new((*state.db).clone());
    let input = CreatePurchaseInvoiceInput {
        party_id: payload.party_id,
        supplier_invoice_number: payload.supplier_invoice_number,
        invoice_date: payload.invoice_date,
        total_amount: payload.total_amount,
        remarks: payload.remarks,
    };

    match repo.create_purchase_invoice(input).await {
        Ok(bill) => response::created(bill.id),
        Err(e) => response::failure(e, "create_purchase_invoice"),
    }
}

/// POST `/purchase-invoices/{purchase_invoice_id}/payments` - Pay a supplier.
async fn record_purchase_payment(
    State(state): State<AppState>,
    Path(purchase_invoice_id): Path<Uuid>,
    Json(payload): Json<RecordPurchasePaymentRequest>,
) -> impl IntoResponse {
    let repo = PurchaseInvoiceRepository::new((*state.db).clone());
    let input = RecordPurchasePaymentInput {
        purchase_invoice_id,
        amount: payload.amount,
        payment_date: payload.payment_date,
        mode: payload.mode,
        reference: payload.reference,
        remarks: payload.remarks,
    };

    match repo.record_purchase_payment(input).await {
        Ok(_) => response::ok(),
        Err(e) => response::failure(e, "record_purchase_payment"),
    }
}
