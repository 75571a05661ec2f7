//! Invoice and payment routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tally_shared::ActionResult;
use uuid::Uuid;

use crate::{AppState, response};
use tally_core::invoice::{InvoiceError, InvoiceStatus, RequestedLine};
use tally_db::repositories::{
    CreateInvoiceInput, InvoiceRepository, PaymentRepository, RecordPaymentInput,
};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", post(create_invoice))
        .route("/invoices/bulk-paid", post(bulk_mark_as_paid))
        .route("/invoices/{invoice_id}", get(get_invoice))
        .route(
            "/invoices/{invoice_id}/payments",
            get(list_payments).post(record_payment),
        )
        .route("/invoices/{invoice_id}/status", patch(update_payment_status))
}

/// Request body for issuing an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Purchase order being billed.
    pub purchase_order_id: Uuid,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Free-text remarks.
    pub remarks: Option<String>,
    /// Lines to bill.
    pub line_items: Vec<RequestedLine>,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// Amount received.
    pub amount: Decimal,
    /// Date received.
    pub payment_date: NaiveDate,
    /// Payment mode.
    pub mode: Option<String>,
    /// Bank or cheque reference.
    pub reference: Option<String>,
    /// Free-text remarks.
    pub remarks: Option<String>,
}

/// Request body for a manual status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status, e.g. `SENT` or `PAID`.
    pub status: String,
}

/// Request body for bulk settlement.
#[derive(Debug, Deserialize)]
pub struct BulkPaidRequest {
    /// Invoices to mark as paid.
    pub invoice_ids: Vec<Uuid>,
}

/// POST `/invoices` - Issue an invoice against dispatched quantities.
async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone(), (*state.billing).clone());
    let input = CreateInvoiceInput {
        purchase_order_id: payload.purchase_order_id,
        invoice_date: payload.invoice_date,
        remarks: payload.remarks,
        lines: payload.line_items,
    };

    match repo.create_invoice(input).await {
        Ok(invoice) => response::created(invoice.id),
        Err(e) => response::failure(e, "create_invoice"),
    }
}

/// GET `/invoices/{invoice_id}` - Invoice with its lines.
async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone(), (*state.billing).clone());
    match repo.get_invoice(invoice_id).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => response::failure(e, "get_invoice"),
    }
}

/// POST `/invoices/{invoice_id}/payments` - Record a payment.
async fn record_payment(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone(), state.billing.bulk_limit);
    let input = RecordPaymentInput {
        invoice_id,
        amount: payload.amount,
        payment_date: payload.payment_date,
        mode: payload.mode,
        reference: payload.reference,
        remarks: payload.remarks,
    };

    match repo.record_payment(input).await {
        Ok(_) => response::ok(),
        Err(e) => response::failure(e, "record_payment"),
    }
}

/// GET `/invoices/{invoice_id}/payments` - Payments in date order.
async fn list_payments(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone(), state.billing.bulk_limit);
    match repo.list_invoice_payments(invoice_id).await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(e) => response::failure(e, "list_invoice_payments"),
    }
}

/// PATCH `/invoices/{invoice_id}/status` - Manual status override.
async fn update_payment_status(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let Some(status) = InvoiceStatus::parse(&payload.status) else {
        return response::failure(InvoiceError::UnknownStatus(payload.status), "update_payment_status");
    };

    let repo = InvoiceRepository::new((*state.db).clone(), (*state.billing).clone());
    match repo.update_payment_status(invoice_id, status).await {
        Ok(_) => response::ok(),
        Err(e) => response::failure(e, "update_payment_status"),
    }
}

/// POST `/invoices/bulk-paid` - Mark several invoices as paid.
async fn bulk_mark_as_paid(
    State(state): State<AppState>,
    Json(payload): Json<BulkPaidRequest>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone(), state.billing.bulk_limit);
    match repo.bulk_mark_as_paid(&payload.invoice_ids).await {
        Ok(count) => (StatusCode::OK, Json(ActionResult::counted(count))).into_response(),
        Err(e) => response::failure(e, "bulk_mark_as_paid"),
    }
}
