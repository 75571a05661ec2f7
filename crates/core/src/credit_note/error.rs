//! Credit note error types.

use tally_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use super::types::CreditNoteStatus;
use crate::numbering::NumberingError;

/// Credit note issuance, adjustment and cancellation errors.
#[derive(Debug, Error)]
pub enum CreditNoteError {
    /// A credit note needs at least one line.
    #[error("Credit note must have at least one item")]
    NoItems,

    /// Line quantity must be positive.
    #[error("Quantity for '{0}' must be greater than zero")]
    NonPositiveQuantity(String),

    /// Line rate must not be negative.
    #[error("Rate for '{0}' must not be negative")]
    NegativeRate(String),

    /// The note would credit nothing.
    #[error("Credit note total must be greater than zero")]
    ZeroTotal,

    /// The note has already been applied.
    #[error("Credit note already adjusted")]
    AlreadyAdjusted,

    /// The note was cancelled.
    #[error("Credit note is cancelled")]
    Cancelled,

    /// Status change not permitted.
    #[error("Cannot cancel a credit note in status {0}")]
    InvalidCancellation(CreditNoteStatus),

    /// Credit note not found.
    #[error("Credit note not found: {0}")]
    NotFound(Uuid),

    /// Party not found.
    #[error("Party not found: {0}")]
    PartyNotFound(Uuid),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// The invoice is billed to another party.
    #[error("Credit note and invoice belong to different parties")]
    PartyMismatch,

    /// Cancelled invoices cannot be credited.
    #[error("Invoice {0} is cancelled")]
    InvoiceCancelled(Uuid),

    /// Nothing is owed on the invoice.
    #[error("Invoice {0} has no outstanding balance")]
    InvoiceSettled(Uuid),

    /// Number allocation failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    /// The note or invoice changed between read and update.
    #[error("Credit note or invoice was modified concurrently, please retry")]
    ConcurrentModification,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl CreditNoteError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoItems => "NO_ITEMS",
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::NegativeRate(_) => "NEGATIVE_RATE",
            Self::ZeroTotal => "ZERO_TOTAL",
            Self::AlreadyAdjusted => "ALREADY_ADJUSTED",
            Self::Cancelled => "CREDIT_NOTE_CANCELLED",
            Self::InvalidCancellation(_) => "INVALID_CANCELLATION",
            Self::NotFound(_) => "CREDIT_NOTE_NOT_FOUND",
            Self::PartyNotFound(_) => "PARTY_NOT_FOUND",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::PartyMismatch => "PARTY_MISMATCH",
            Self::InvoiceCancelled(_) => "INVOICE_CANCELLED",
            Self::InvoiceSettled(_) => "INVOICE_SETTLED",
            Self::Numbering(e) => e.error_code(),
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NoItems
            | Self::NonPositiveQuantity(_)
            | Self::NegativeRate(_)
            | Self::ZeroTotal => 400,
            Self::NotFound(_) | Self::PartyNotFound(_) | Self::InvoiceNotFound(_) => 404,
            Self::ConcurrentModification => 409,
            Self::Numbering(e) => e.http_status_code(),
            Self::AlreadyAdjusted
            | Self::Cancelled
            | Self::InvalidCancellation(_)
            | Self::PartyMismatch
            | Self::InvoiceCancelled(_)
            | Self::InvoiceSettled(_) => 422,
            Self::Database(_) => 500,
        }
    }
}

impl From<CreditNoteError> for AppError {
    fn from(err: CreditNoteError) -> Self {
        match err {
            CreditNoteError::Numbering(e) => e.into(),
            CreditNoteError::Database(msg) => Self::Database(msg),
            CreditNoteError::NotFound(_)
            | CreditNoteError::PartyNotFound(_)
            | CreditNoteError::InvoiceNotFound(_) => Self::NotFound(err.to_string()),
            CreditNoteError::ConcurrentModification => Self::Conflict(err.to_string()),
            CreditNoteError::NoItems
            | CreditNoteError::NonPositiveQuantity(_)
            | CreditNoteError::NegativeRate(_)
            | CreditNoteError::ZeroTotal => Self::Validation(err.to_string()),
            CreditNoteError::AlreadyAdjusted
            | CreditNoteError::Cancelled
            | CreditNoteError::InvalidCancellation(_)
            | CreditNoteError::PartyMismatch
            | CreditNoteError::InvoiceCancelled(_)
            | CreditNoteError::InvoiceSettled(_) => Self::BusinessRule(err.to_string()),
        }
    }
}
