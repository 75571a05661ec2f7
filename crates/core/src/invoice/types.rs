//! Invoice domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::payment::PaymentStatus;
use crate::quantity::LineItemQuantities;
use tally_shared::types::round_money;

/// Status of a sales invoice.
///
/// `Draft`, `Sent` and `Cancelled` describe the document lifecycle;
/// `Unpaid`, `PartiallyPaid` and `Paid` are written by settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Issued but not yet sent to the customer.
    Draft,
    /// Sent to the customer.
    Sent,
    /// Nothing settled.
    Unpaid,
    /// Partly settled by payments or credit.
    PartiallyPaid,
    /// Fully settled.
    Paid,
    /// Withdrawn.
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Unpaid => "UNPAID",
            Self::PartiallyPaid => "PARTIALLY_PAID",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "SENT" => Some(Self::Sent),
            "UNPAID" => Some(Self::Unpaid),
            "PARTIALLY_PAID" => Some(Self::PartiallyPaid),
            "PAID" => Some(Self::Paid),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further settlement or status change is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    /// Payment-derived view of the status.
    #[must_use]
    pub fn payment_view(&self) -> PaymentStatus {
        match self {
            Self::Paid => PaymentStatus::Paid,
            Self::PartiallyPaid => PaymentStatus::PartiallyPaid,
            Self::Draft | Self::Sent | Self::Unpaid | Self::Cancelled => PaymentStatus::Unpaid,
        }
    }
}

impl From<PaymentStatus> for InvoiceStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unpaid => Self::Unpaid,
            PaymentStatus::PartiallyPaid => Self::PartiallyPaid,
            PaymentStatus::Paid => Self::Paid,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One requested invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedLine {
    /// Purchase order line item being billed.
    pub po_line_item_id: Uuid,
    /// Quantity to bill.
    pub qty: Decimal,
    /// Unit rate.
    pub rate: Decimal,
}

/// Live quantities of a purchase order line item, read inside the issuing
/// transaction.
#[derive(Debug, Clone)]
pub struct LineAvailability {
    /// Line item ID.
    pub po_line_item_id: Uuid,
    /// Part number, used in error messages.
    pub part_number: String,
    /// Cumulative quantities.
    pub quantities: LineItemQuantities,
    /// Sum of quantities on existing invoice lines.
    pub invoiced_qty: Decimal,
}

/// A validated invoice line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedLine {
    /// Purchase order line item being billed.
    pub po_line_item_id: Uuid,
    /// Quantity billed.
    pub qty: Decimal,
    /// Unit rate.
    pub rate: Decimal,
    /// `qty * rate`, unrounded.
    pub amount: Decimal,
}

/// Invoice money totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line amounts.
    pub subtotal: Decimal,
    /// Central GST.
    pub cgst: Decimal,
    /// State GST.
    pub sgst: Decimal,
    /// Integrated GST.
    pub igst: Decimal,
    /// Subtotal plus all tax components.
    pub total: Decimal,
}

impl InvoiceTotals {
    /// Rounds every component to the money scale for persistence.
    ///
    /// The total is re-derived from the rounded components so that the
    /// stored `total = subtotal + cgst + sgst + igst` holds exactly.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let subtotal = round_money(self.subtotal);
        let cgst = round_money(self.cgst);
        let sgst = round_money(self.sgst);
        let igst = round_money(self.igst);
        Self {
            subtotal,
            cgst,
            sgst,
            igst,
            total: subtotal + cgst + sgst + igst,
        }
    }
}

/// A fully validated invoice ready to be numbered and persisted.
#[derive(Debug, Clone)]
pub struct PreparedInvoice {
    /// Validated lines in request order.
    pub lines: Vec<PreparedLine>,
    /// Unrounded totals.
    pub totals: InvoiceTotals,
}
