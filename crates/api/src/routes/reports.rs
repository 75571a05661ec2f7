//! Aging report and audit trail routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppState, response};
use tally_core::aging::AgingSide;
use tally_db::repositories::{AgingRepository, AuditRepository};
use tally_shared::AppError;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/aging/{side}", get(aging))
        .route("/audit-logs", get(list_audit_logs))
}

const DEFAULT_AUDIT_LIMIT: u64 = 50;
const MAX_AUDIT_LIMIT: u64 = 500;

/// Aging report date.
#[derive(Debug, Deserialize)]
pub struct AgingQuery {
    /// Age documents as of this date instead of today.
    pub as_of: Option<NaiveDate>,
}

/// Audit listing window.
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    /// Rows to return, newest first.
    pub limit: Option<u64>,
}

/// GET `/reports/aging/{side}` - Balances by age for `receivables` or
/// `payables`.
async fn aging(
    State(state): State<AppState>,
    Path(side): Path<AgingSide>,
    Query(query): Query<AgingQuery>,
) -> impl IntoResponse {
    let repo = AgingRepository::new((*state.db).clone());
    match repo.get_aging(side, query.as_of).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => response::failure(AppError::Database(e.to_string()), "get_aging"),
    }
}

/// GET `/audit-logs` - Most recent audit rows.
async fn list_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> impl IntoResponse {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .clamp(1, MAX_AUDIT_LIMIT);
    let repo = AuditRepository::new((*state.db).clone());
    match repo.list_recent(limit).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => response::failure(AppError::Database(e.to_string()), "list_audit_logs"),
    }
}
