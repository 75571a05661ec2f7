//! Invoice error types.

use rust_decimal::Decimal;
use tally_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use super::types::InvoiceStatus;
use crate::numbering::NumberingError;
use crate::quantity::QuantityError;

/// Invoice issuance and status errors.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// An invoice needs at least one line.
    #[error("Invoice must have at least one line item")]
    NoLineItems,

    /// Line quantity must be positive.
    #[error("Quantity for part {part} must be greater than zero")]
    NonPositiveQuantity {
        /// Part number of the line.
        part: String,
    },

    /// Line rate must not be negative.
    #[error("Rate for part {part} must not be negative")]
    NegativeRate {
        /// Part number of the line.
        part: String,
    },

    /// The line item does not belong to the purchase order.
    #[error("Line item {0} does not belong to this purchase order")]
    LineItemNotOnOrder(Uuid),

    /// Requested quantity is more than has been dispatched and not invoiced.
    #[error(
        "Quantity {requested} for part {part} exceeds invoiceable balance {available}"
    )]
    QuantityExceedsBalance {
        /// Part number of the line.
        part: String,
        /// Total quantity requested for the line item.
        requested: Decimal,
        /// Invoiceable balance.
        available: Decimal,
    },

    /// Stored quantities are corrupt.
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    /// Number allocation failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    /// Purchase order not found.
    #[error("Purchase order not found: {0}")]
    PurchaseOrderNotFound(Uuid),

    /// Cancelled purchase orders cannot be invoiced.
    #[error("Purchase order {0} is cancelled")]
    PurchaseOrderCancelled(Uuid),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Unknown status name.
    #[error("Unknown invoice status: {0}")]
    UnknownStatus(String),

    /// Status override not permitted.
    #[error("Cannot change invoice status from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: InvoiceStatus,
        /// Requested status.
        to: InvoiceStatus,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl InvoiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLineItems => "NO_LINE_ITEMS",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::NegativeRate { .. } => "NEGATIVE_RATE",
            Self::LineItemNotOnOrder(_) => "LINE_ITEM_NOT_ON_ORDER",
            Self::QuantityExceedsBalance { .. } => "QUANTITY_EXCEEDS_BALANCE",
            Self::Quantity(e) => e.error_code(),
            Self::Numbering(e) => e.error_code(),
            Self::PurchaseOrderNotFound(_) => "PURCHASE_ORDER_NOT_FOUND",
            Self::PurchaseOrderCancelled(_) => "PURCHASE_ORDER_CANCELLED",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::UnknownStatus(_) => "UNKNOWN_STATUS",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NoLineItems
            | Self::NonPositiveQuantity { .. }
            | Self::NegativeRate { .. }
            | Self::LineItemNotOnOrder(_)
            | Self::QuantityExceedsBalance { .. }
            | Self::UnknownStatus(_) => 400,

            // 404 Not Found
            Self::PurchaseOrderNotFound(_) | Self::InvoiceNotFound(_) => 404,

            // 422 Unprocessable - business rules
            Self::PurchaseOrderCancelled(_) | Self::InvalidStatusTransition { .. } => 422,

            Self::Quantity(e) => e.http_status_code(),
            Self::Numbering(e) => e.http_status_code(),

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::Quantity(e) => e.into(),
            InvoiceError::Numbering(e) => e.into(),
            InvoiceError::PurchaseOrderNotFound(_) | InvoiceError::InvoiceNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            InvoiceError::PurchaseOrderCancelled(_)
            | InvoiceError::InvalidStatusTransition { .. } => Self::BusinessRule(err.to_string()),
            InvoiceError::Database(msg) => Self::Database(msg),
            InvoiceError::NoLineItems
            | InvoiceError::NonPositiveQuantity { .. }
            | InvoiceError::NegativeRate { .. }
            | InvoiceError::LineItemNotOnOrder(_)
            | InvoiceError::QuantityExceedsBalance { .. }
            | InvoiceError::UnknownStatus(_) => Self::Validation(err.to_string()),
        }
    }
}
