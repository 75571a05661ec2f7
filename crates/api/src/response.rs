//! Response helpers shared by the route handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tally_shared::{ActionResult, AppError};
use tracing::error;

/// Converts a failure into an `ActionResult` response.
///
/// Persistence and internal failures are logged with their detail and
/// reach the caller only as a generic message.
pub fn failure(err: impl Into<AppError>, operation: &'static str) -> Response {
    let err: AppError = err.into();
    if err.is_internal() {
        error!(error = %err, operation, "Request failed");
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ActionResult::from(&err))).into_response()
}

/// A `201 Created` response carrying the new document's id.
pub fn created(id: uuid::Uuid) -> Response {
    (StatusCode::CREATED, Json(ActionResult::created(id))).into_response()
}

/// A bare `200 OK` success.
pub fn ok() -> Response {
    (StatusCode::OK, Json(ActionResult::ok())).into_response()
}
