//! Payment domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settlement state of an invoice derived from what has been paid.
///
/// Shared by sales invoices and supplier purchase invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Nothing settled.
    Unpaid,
    /// Partly settled.
    PartiallyPaid,
    /// Fully settled.
    Paid,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "UNPAID",
            Self::PartiallyPaid => "PARTIALLY_PAID",
            Self::Paid => "PAID",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "UNPAID" => Some(Self::Unpaid),
            "PARTIALLY_PAID" => Some(Self::PartiallyPaid),
            "PAID" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Amounts of an invoice after a settlement has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// Total settled so far, including this payment.
    pub paid_amount: Decimal,
    /// Remaining balance, never negative.
    pub balance_due: Decimal,
    /// Derived settlement status.
    pub status: PaymentStatus,
}

/// Payment synthesized for one invoice of a bulk settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkSettlement {
    /// Amount of the synthesized payment; `None` when nothing was owed.
    pub payment_amount: Option<Decimal>,
    /// Amounts to persist on the invoice.
    pub outcome: PaymentOutcome,
}
