//! Document numbering error types.

use tally_shared::AppError;
use thiserror::Error;

use super::sequence::DocumentKind;

/// Errors raised while allocating document numbers.
#[derive(Debug, Error)]
pub enum NumberingError {
    /// Every allocation attempt hit an existing number.
    #[error("{0} number already exists")]
    AlreadyExists(DocumentKind),
}

impl NumberingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyExists(_) => "DOCUMENT_NUMBER_EXISTS",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::AlreadyExists(_) => 409,
        }
    }

    /// Returns true if the caller may retry the whole request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}

impl From<NumberingError> for AppError {
    fn from(err: NumberingError) -> Self {
        Self::Conflict(err.to_string())
    }
}
