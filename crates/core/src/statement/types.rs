//! Party statement types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What a trading party is to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    /// Customer division that places purchase orders.
    Customer,
    /// Supplier we buy from.
    Supplier,
    /// Both.
    Both,
}

impl PartyKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::Both => "both",
        }
    }
}

/// Kind of document behind a statement line.
///
/// Declaration order is the tie-break order for lines on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// Sales invoice (debit).
    Invoice,
    /// Payment received against a sales invoice (credit).
    Payment,
    /// Supplier invoice (credit).
    PurchaseInvoice,
    /// Payment made against a supplier invoice (debit).
    SupplierPayment,
    /// Credit note issued to the party (credit).
    CreditNote,
}

impl EntryKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "INVOICE",
            Self::Payment => "PAYMENT",
            Self::PurchaseInvoice => "PURCHASE_INVOICE",
            Self::SupplierPayment => "SUPPLIER_PAYMENT",
            Self::CreditNote => "CREDIT_NOTE",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side a running balance sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSide {
    /// Party owes us.
    Dr,
    /// We owe the party.
    Cr,
    /// Settled.
    Nil,
}

impl BalanceSide {
    /// Side of a signed balance.
    #[must_use]
    pub fn of(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            Self::Dr
        } else if balance < Decimal::ZERO {
            Self::Cr
        } else {
            Self::Nil
        }
    }
}

/// One document before sorting and balancing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementLine {
    /// Source document ID.
    pub id: Uuid,
    /// Document date.
    pub date: NaiveDate,
    /// Document kind.
    pub kind: EntryKind,
    /// Document number or payment reference.
    pub reference: String,
    /// Human-readable description.
    pub description: String,
    /// Amount increasing what the party owes.
    pub debit: Decimal,
    /// Amount decreasing what the party owes.
    pub credit: Decimal,
}

/// A statement line with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementEntry {
    /// Source document ID.
    pub id: Uuid,
    /// Document date.
    pub date: NaiveDate,
    /// Document kind.
    pub kind: EntryKind,
    /// Document number or payment reference.
    pub reference: String,
    /// Human-readable description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after this line, positive when the party owes us.
    pub balance: Decimal,
    /// Side of `balance`.
    pub side: BalanceSide,
}

/// Party header of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySummary {
    /// Party ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// GST identification number.
    pub gstin: Option<String>,
    /// Party kind.
    pub kind: PartyKind,
}

/// Inclusive date window; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date included.
    pub from: Option<NaiveDate>,
    /// Last date included.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a window.
    #[must_use]
    pub const fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Chronological ledger of one party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyStatement {
    /// Party header.
    pub party: PartySummary,
    /// Lines in date order with running balance.
    pub entries: Vec<StatementEntry>,
    /// Balance carried in from the party master.
    pub opening_balance: Decimal,
    /// Balance after the last entry.
    pub closing_balance: Decimal,
    /// Side of the closing balance.
    pub closing_side: BalanceSide,
}
