//! Payment error types.

use rust_decimal::Decimal;
use tally_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Payment recording and settlement errors.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Payment amount must be positive.
    #[error("Payment amount must be greater than zero")]
    NonPositiveAmount,

    /// Payment would settle more than is owed.
    #[error("Payment exceeds remaining balance of {remaining}")]
    ExceedsBalance {
        /// Amount still owed on the invoice.
        remaining: Decimal,
    },

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Purchase invoice not found.
    #[error("Purchase invoice not found: {0}")]
    PurchaseInvoiceNotFound(Uuid),

    /// Cancelled invoices accept no payments.
    #[error("Invoice {0} is cancelled")]
    InvoiceCancelled(Uuid),

    /// Paid invoices accept no further payments.
    #[error("Invoice {0} is already paid")]
    InvoicePaid(Uuid),

    /// Bulk settlement needs at least one invoice.
    #[error("No invoices selected")]
    EmptyBatch,

    /// Bulk settlement is capped.
    #[error("Cannot settle {count} invoices at once (limit {limit})")]
    TooManyInvoices {
        /// Distinct invoices requested.
        count: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// The invoice changed between read and update.
    #[error("Invoice was modified concurrently, please retry")]
    ConcurrentModification,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::ExceedsBalance { .. } => "EXCEEDS_BALANCE",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::PurchaseInvoiceNotFound(_) => "PURCHASE_INVOICE_NOT_FOUND",
            Self::InvoiceCancelled(_) => "INVOICE_CANCELLED",
            Self::InvoicePaid(_) => "INVOICE_PAID",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::TooManyInvoices { .. } => "TOO_MANY_INVOICES",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount
            | Self::ExceedsBalance { .. }
            | Self::EmptyBatch
            | Self::TooManyInvoices { .. } => 400,
            Self::InvoiceNotFound(_) | Self::PurchaseInvoiceNotFound(_) => 404,
            Self::ConcurrentModification => 409,
            Self::InvoiceCancelled(_) | Self::InvoicePaid(_) => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvoiceNotFound(_) | PaymentError::PurchaseInvoiceNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            PaymentError::InvoiceCancelled(_) | PaymentError::InvoicePaid(_) => {
                Self::BusinessRule(err.to_string())
            }
            PaymentError::ConcurrentModification => Self::Conflict(err.to_string()),
            PaymentError::Database(msg) => Self::Database(msg),
            PaymentError::NonPositiveAmount
            | PaymentError::ExceedsBalance { .. }
            | PaymentError::EmptyBatch
            | PaymentError::TooManyInvoices { .. } => Self::Validation(err.to_string()),
        }
    }
}
