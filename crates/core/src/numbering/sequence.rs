//! Sequential document numbers.
//!
//! A number is `<prefix><seq>` where `seq` is zero-padded to
//! [`SEQUENCE_WIDTH`] digits. The next sequence is derived from the
//! lexicographically greatest number already issued under the same prefix.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::fiscal::FiscalYear;

/// Minimum digits in the sequence part of a document number.
pub const SEQUENCE_WIDTH: usize = 3;

/// Kinds of numbered documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Sales invoice, numbered per fiscal year.
    Invoice,
    /// Credit note, numbered globally.
    CreditNote,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoice => f.write_str("Invoice"),
            Self::CreditNote => f.write_str("Credit note"),
        }
    }
}

/// Builds the invoice prefix for a date, e.g. `SSI/INV/2024-25/`.
#[must_use]
pub fn invoice_prefix(root: &str, date: NaiveDate) -> String {
    let root = root.trim_end_matches('/');
    format!("{root}/{}/", FiscalYear::containing(date).label())
}

/// Returns the sequence that follows `last` under `prefix`.
///
/// The trailing `/`-separated segment of `last` (after stripping the prefix)
/// is parsed as an integer. Starts at 1 when nothing has been issued or the
/// last number cannot be parsed.
#[must_use]
pub fn next_sequence(prefix: &str, last: Option<&str>) -> u32 {
    let Some(last) = last else {
        return 1;
    };
    let tail = last.strip_prefix(prefix).unwrap_or(last);
    let segment = tail.rsplit('/').next().unwrap_or(tail);

    match segment.trim().parse::<u32>() {
        Ok(n) => n.saturating_add(1),
        Err(_) => 1,
    }
}

/// Formats a document number.
#[must_use]
pub fn format_number(prefix: &str, sequence: u32) -> String {
    format!("{prefix}{sequence:0width$}", width = SEQUENCE_WIDTH)
}

/// Returns the next document number under `prefix`.
#[must_use]
pub fn next_number(prefix: &str, last: Option<&str>) -> String {
    format_number(prefix, next_sequence(prefix, last))
}
