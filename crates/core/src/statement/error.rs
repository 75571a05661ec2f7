//! Statement error types.

use chrono::NaiveDate;
use tally_shared::AppError;
use thiserror::Error;

/// Errors raised while building a party statement.
#[derive(Debug, Error)]
pub enum StatementError {
    /// `from` is after `to`.
    #[error("Invalid date range: start {from} is after end {to}")]
    InvalidDateRange {
        /// Start date.
        from: NaiveDate,
        /// End date.
        to: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl StatementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
            Self::Database(_) => 500,
        }
    }
}

impl From<StatementError> for AppError {
    fn from(err: StatementError) -> Self {
        match err {
            StatementError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
            StatementError::Database(msg) => Self::Database(msg),
        }
    }
}
