//! Purchase order fulfilment status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::balance::LineItemQuantities;

/// Lifecycle status of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    /// Nothing dispatched yet.
    Open,
    /// Some, but not all, ordered quantity dispatched.
    PartiallyFulfilled,
    /// Every line fully dispatched.
    Completed,
    /// Withdrawn by the customer.
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::PartiallyFulfilled => "PARTIALLY_FULFILLED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Derives the status after a dispatch from the order's line items.
    ///
    /// A cancelled order stays cancelled.
    #[must_use]
    pub fn after_dispatch(current: Self, items: &[LineItemQuantities]) -> Self {
        if current == Self::Cancelled {
            return current;
        }
        if !items.is_empty() && items.iter().all(LineItemQuantities::is_fully_dispatched) {
            return Self::Completed;
        }
        if items.iter().any(|q| q.dispatched > Decimal::ZERO) {
            return Self::PartiallyFulfilled;
        }
        Self::Open
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
