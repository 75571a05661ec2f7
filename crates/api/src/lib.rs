//! HTTP API layer with Axum routes.
//!
//! Exposes the settlement operations as JSON endpoints. Writes answer with
//! an `ActionResult` envelope; reads return the document or report itself.

pub mod response;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tally_shared::BillingConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Numbering, tax and batch settings.
    pub billing: Arc<BillingConfig>,
}

impl AppState {
    /// Creates the shared state.
    #[must_use]
    pub fn new(db: DatabaseConnection, billing: BillingConfig) -> Self {
        Self {
            db: Arc::new(db),
            billing: Arc::new(billing),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
