//! Purchase order and gate-pass routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, response};
use tally_db::repositories::{CreatePurchaseOrderInput, NewLineItem, PurchaseOrderRepository};

/// Creates the purchase order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchase-orders", post(create_purchase_order))
        .route("/purchase-orders/dispatched", get(list_dispatched))
        .route("/purchase-orders/{po_id}", get(get_purchase_order))
        .route("/po-line-items/{line_item_id}/inward", post(record_inward))
        .route("/po-line-items/{line_item_id}/outward", post(record_outward))
}

/// One line of a new purchase order.
#[derive(Debug, Deserialize)]
pub struct LineItemRequest {
    /// Customer part number.
    pub part_number: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Unit of measure.
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Agreed rate.
    pub rate: Decimal,
    /// Ordered quantity.
    pub qty_ordered: Decimal,
}

fn default_unit() -> String {
    "NOS".to_string()
}

/// Request body for creating a purchase order.
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrderRequest {
    /// Customer's PO number.
    pub po_number: String,
    /// Ordering party.
    pub party_id: Uuid,
    /// PO date.
    pub po_date: NaiveDate,
    /// Requested delivery date.
    pub delivery_date: Option<NaiveDate>,
    /// Lines.
    pub line_items: Vec<LineItemRequest>,
}

/// Request body for a gate pass.
#[derive(Debug, Deserialize)]
pub struct GatePassRequest {
    /// Quantity moved through the gate.
    pub qty: Decimal,
}

/// POST `/purchase-orders` - Create a purchase order with its lines.
async fn create_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new((*state.db).clone());
    let input = CreatePurchaseOrderInput {
        po_number: payload.po_number,
        party_id: payload.party_id,
        po_date: payload.po_date,
        delivery_date: payload.delivery_date,
        line_items: payload
            .line_items
            .into_iter()
            .map(|l| NewLineItem {
                part_number: l.part_number,
                description: l.description,
                unit: l.unit,
                rate: l.rate,
                qty_ordered: l.qty_ordered,
            })
            .collect(),
    };

    match repo.create_purchase_order(input).await {
        Ok(po) => response::created(po.purchase_order.id),
        Err(e) => response::failure(e, "create_purchase_order"),
    }
}

/// GET `/purchase-orders/{po_id}` - Order with its lines.
async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new((*state.db).clone());
    match repo.get_purchase_order(po_id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => response::failure(e, "get_purchase_order"),
    }
}

/// GET `/purchase-orders/dispatched` - Orders with material awaiting invoicing.
async fn list_dispatched(State(state): State<AppState>) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new((*state.db).clone());
    match repo.get_pos_with_dispatches().await {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(e) => response::failure(e, "get_pos_with_dispatches"),
    }
}

/// POST `/po-line-items/{line_item_id}/inward` - Record received material.
async fn record_inward(
    State(state): State<AppState>,
    Path(line_item_id): Path<Uuid>,
    Json(payload): Json<GatePassRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new((*state.db).clone());
    match repo.record_inward(line_item_id, payload.qty).await {
        Ok(_) => response::ok(),
        Err(e) => response::failure(e, "record_inward"),
    }
}

/// POST `/po-line-items/{line_item_id}/outward` - Record dispatched material.
async fn record_outward(
    State(state): State<AppState>,
    Path(line_item_id): Path<Uuid>,
    Json(payload): Json<GatePassRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new((*state.db).clone());
    match repo.record_outward(line_item_id, payload.qty).await {
        Ok(_) => response::ok(),
        Err(e) => response::failure(e, "record_outward"),
    }
}
