//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod credit_notes;
pub mod health;
pub mod invoices;
pub mod parties;
pub mod purchase_invoices;
pub mod purchase_orders;
pub mod reports;


/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(parties::routes())
        .merge(purchase_orders::routes())
        .merge(invoices::routes())
        .merge(credit_notes::routes())
        .merge(purchase_invoices::routes())
        .merge(reports::routes())
}
