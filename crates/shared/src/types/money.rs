//! Fixed-point money helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are carried at full `Decimal` precision through every derived
//! sum and rounded to [`MONEY_SCALE`] places only when persisted.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits stored for every monetary column.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to the persisted money scale (half away from zero).
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps an amount at zero.
#[must_use]
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Computes `percent`% of `base` without rounding.
#[must_use]
pub fn percent_of(base: Decimal, percent: Decimal) -> Decimal {
    base * percent / Decimal::ONE_HUNDRED
}
