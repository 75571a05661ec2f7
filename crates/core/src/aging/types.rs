//! Aging report types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Age band of an outstanding document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// 0 to 30 days.
    Current,
    /// 31 to 60 days.
    Days31To60,
    /// 61 to 90 days.
    Days61To90,
    /// 91 days and older.
    Days90Plus,
}

/// Which side of the books an aging report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingSide {
    /// Unpaid sales invoices.
    Receivables,
    /// Unpaid purchase invoices.
    Payables,
}

/// One document with money still outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutstandingDocument {
    /// Party owing or owed.
    pub party_id: Uuid,
    /// Party display name.
    pub party_name: String,
    /// Document date.
    pub date: NaiveDate,
    /// Outstanding amount.
    pub outstanding: Decimal,
}

/// Per-party aging totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingRow {
    /// Party ID.
    pub party_id: Uuid,
    /// Party display name.
    pub party_name: String,
    /// 0 to 30 days.
    pub current: Decimal,
    /// 31 to 60 days.
    pub days_31_60: Decimal,
    /// 61 to 90 days.
    pub days_61_90: Decimal,
    /// 91 days and older.
    pub days_90_plus: Decimal,
    /// Sum of all bands.
    pub total: Decimal,
}

impl AgingRow {
    /// Empty row for a party.
    #[must_use]
    pub fn new(party_id: Uuid, party_name: String) -> Self {
        Self {
            party_id,
            party_name,
            current: Decimal::ZERO,
            days_31_60: Decimal::ZERO,
            days_61_90: Decimal::ZERO,
            days_90_plus: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// Adds an amount to a band and to the total.
    pub fn add(&mut self, bucket: AgingBucket, amount: Decimal) {
        let band = match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Days31To60 => &mut self.days_31_60,
            AgingBucket::Days61To90 => &mut self.days_61_90,
            AgingBucket::Days90Plus => &mut self.days_90_plus,
        };
        *band += amount;
        self.total += amount;
    }
}
