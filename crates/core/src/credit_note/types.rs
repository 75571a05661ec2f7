//! Credit note domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::invoice::InvoiceStatus;
use crate::payment::PaymentStatus;

/// Credit note lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditNoteStatus {
    /// Issued, not yet applied.
    Pending,
    /// Applied to an invoice. Terminal.
    Adjusted,
    /// Withdrawn before being applied. Terminal.
    Cancelled,
}

impl CreditNoteStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Adjusted => "ADJUSTED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "ADJUSTED" => Some(Self::Adjusted),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for CreditNoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requested credit note line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditNoteItemInput {
    /// Free-text description.
    pub description: String,
    /// Quantity credited.
    pub qty: Decimal,
    /// Unit rate.
    pub rate: Decimal,
}

/// A validated credit note line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCreditNoteItem {
    /// Free-text description.
    pub description: String,
    /// Quantity credited.
    pub qty: Decimal,
    /// Unit rate.
    pub rate: Decimal,
    /// `qty * rate`.
    pub amount: Decimal,
}

/// A validated credit note ready to be numbered and persisted.
#[derive(Debug, Clone)]
pub struct PreparedCreditNote {
    /// Validated lines in request order.
    pub items: Vec<PreparedCreditNoteItem>,
    /// Sum of line amounts.
    pub total: Decimal,
}

/// The parts of an invoice a credit adjustment reads.
#[derive(Debug, Clone, Copy)]
pub struct CreditTarget {
    /// Invoice ID.
    pub invoice_id: Uuid,
    /// Party billed on the invoice.
    pub party_id: Uuid,
    /// Current status.
    pub status: InvoiceStatus,
    /// Amount settled so far.
    pub paid_amount: Decimal,
    /// Amount still owed.
    pub balance_due: Decimal,
}

/// Result of applying a credit note to an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    /// Credit actually applied, `min(credit, balance)`.
    pub applied: Decimal,
    /// Credit that did not fit the balance. Not carried forward.
    pub excess: Decimal,
    /// Invoice paid amount after the adjustment.
    pub paid_amount: Decimal,
    /// Invoice balance after the adjustment.
    pub balance_due: Decimal,
    /// Invoice status after the adjustment.
    pub status: PaymentStatus,
}
