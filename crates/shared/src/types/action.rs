//! Success/failure envelope returned by every write operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Outcome of a write operation as seen by the caller.
///
/// Serializes to `{"success": true, "id": ...}` or
/// `{"success": false, "error": "..."}`; absent fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Identifier of the created document, when one was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Number of affected records, for batch operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Human-readable failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    /// A bare success.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            id: None,
            count: None,
            error: None,
        }
    }

    /// A success carrying the created document's id.
    #[must_use]
    pub const fn created(id: Uuid) -> Self {
        Self {
            success: true,
            id: Some(id),
            count: None,
            error: None,
        }
    }

    /// A success carrying a count of affected records.
    #[must_use]
    pub const fn counted(count: usize) -> Self {
        Self {
            success: true,
            id: None,
            count: Some(count),
            error: None,
        }
    }

    /// A failure with a caller-safe message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            count: None,
            error: Some(message.into()),
        }
    }
}

impl From<&AppError> for ActionResult {
    fn from(err: &AppError) -> Self {
        Self::failed(err.user_message())
    }
}
