//! Quantity ledger error types.

use rust_decimal::Decimal;
use tally_shared::AppError;
use thiserror::Error;

/// Errors raised while deriving or mutating line-item quantities.
#[derive(Debug, Error)]
pub enum QuantityError {
    /// A gate-pass quantity must be positive.
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Inward quantity exceeds what is still to be received.
    #[error("Quantity {requested} exceeds receivable balance {available}")]
    ExceedsReceiveBalance {
        /// Requested quantity.
        requested: Decimal,
        /// Remaining quantity still to be received.
        available: Decimal,
    },

    /// Outward quantity exceeds what has been received but not dispatched.
    #[error("Quantity {requested} exceeds dispatchable balance {available}")]
    ExceedsDispatchBalance {
        /// Requested quantity.
        requested: Decimal,
        /// Quantity received and not yet dispatched.
        available: Decimal,
    },

    /// Stored quantities violate `0 <= dispatched <= received <= ordered`.
    #[error(
        "Line item quantities are inconsistent: ordered {ordered}, received {received}, dispatched {dispatched}"
    )]
    InconsistentQuantities {
        /// Cumulative ordered quantity.
        ordered: Decimal,
        /// Cumulative received quantity.
        received: Decimal,
        /// Cumulative dispatched quantity.
        dispatched: Decimal,
    },

    /// More has been invoiced than was ever dispatched.
    #[error("Invoiced quantity {invoiced} exceeds dispatched quantity {dispatched}")]
    OverInvoiced {
        /// Cumulative dispatched quantity.
        dispatched: Decimal,
        /// Sum of all invoice line quantities.
        invoiced: Decimal,
    },
}

impl QuantityError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            Self::ExceedsReceiveBalance { .. } => "EXCEEDS_RECEIVE_BALANCE",
            Self::ExceedsDispatchBalance { .. } => "EXCEEDS_DISPATCH_BALANCE",
            Self::InconsistentQuantities { .. } => "INCONSISTENT_QUANTITIES",
            Self::OverInvoiced { .. } => "OVER_INVOICED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        if self.is_integrity_fault() { 500 } else { 400 }
    }

    /// Returns true if the stored data itself is corrupt, as opposed to a
    /// bad request.
    #[must_use]
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            Self::InconsistentQuantities { .. } | Self::OverInvoiced { .. }
        )
    }
}

impl From<QuantityError> for AppError {
    fn from(err: QuantityError) -> Self {
        if err.is_integrity_fault() {
            Self::Internal(err.to_string())
        } else {
            Self::Validation(err.to_string())
        }
    }
}
