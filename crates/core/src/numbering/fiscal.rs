//! Indian fiscal year (April 1 to March 31) used for invoice numbering.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based month index at which a fiscal year starts (April).
const FISCAL_YEAR_START_MONTH0: u32 = 3;

/// A fiscal year identified by the calendar year it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FiscalYear {
    start_year: i32,
}

impl FiscalYear {
    /// Returns the fiscal year a date falls in.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        let start_year = if date.month0() >= FISCAL_YEAR_START_MONTH0 {
            date.year()
        } else {
            date.year() - 1
        };
        Self { start_year }
    }

    /// Label such as `2024-25`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}-{:02}",
            self.start_year,
            (self.start_year + 1).rem_euclid(100)
        )
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2024, 4, 1), "2024-25")]
    #[case(date(2024, 12, 31), "2024-25")]
    #[case(date(2025, 3, 31), "2024-25")]
    #[case(date(2025, 1, 15), "2024-25")]
    #[case(date(2025, 4, 1), "2025-26")]
    #[case(date(2099, 6, 30), "2099-00")]
    #[case(date(2009, 5, 1), "2009-10")]
    fn test_label(#[case] on: NaiveDate, #[case] expected: &str) {
        assert_eq!(FiscalYear::containing(on).label(), expected);
    }

    #[test]
    fn test_year_boundary() {
        let march = FiscalYear::containing(date(2026, 3, 31));
        let april = FiscalYear::containing(date(2026, 4, 1));
        assert!(march < april);
        assert_eq!(april.to_string(), "2026-27");
    }
}
