//! GST computation.

use rust_decimal::Decimal;
use tally_shared::types::percent_of;
use tally_shared::{BillingConfig, SupplyType};

use super::types::InvoiceTotals;

/// GST percentages applied to a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GstRates {
    /// Central GST percentage (intra-state).
    pub cgst_percent: Decimal,
    /// State GST percentage (intra-state).
    pub sgst_percent: Decimal,
    /// Integrated GST percentage (inter-state).
    pub igst_percent: Decimal,
    /// Which components apply.
    pub supply_type: SupplyType,
}

impl GstRates {
    /// Standard 18% slab for intra-state supply (9% CGST + 9% SGST).
    #[must_use]
    pub const fn intra_state() -> Self {
        Self {
            cgst_percent: Decimal::from_parts(9, 0, 0, false, 0),
            sgst_percent: Decimal::from_parts(9, 0, 0, false, 0),
            igst_percent: Decimal::from_parts(18, 0, 0, false, 0),
            supply_type: SupplyType::IntraState,
        }
    }

    /// Standard 18% slab for inter-state supply (18% IGST).
    #[must_use]
    pub const fn inter_state() -> Self {
        Self {
            supply_type: SupplyType::InterState,
            ..Self::intra_state()
        }
    }

    /// Rates configured for new invoices.
    #[must_use]
    pub fn from_config(billing: &BillingConfig) -> Self {
        Self {
            cgst_percent: billing.cgst_percent,
            sgst_percent: billing.sgst_percent,
            igst_percent: billing.igst_percent,
            supply_type: billing.supply_type,
        }
    }

    /// Computes unrounded totals for a subtotal.
    #[must_use]
    pub fn apply(&self, subtotal: Decimal) -> InvoiceTotals {
        let (cgst, sgst, igst) = match self.supply_type {
            SupplyType::IntraState => (
                percent_of(subtotal, self.cgst_percent),
                percent_of(subtotal, self.sgst_percent),
                Decimal::ZERO,
            ),
            SupplyType::InterState => (
                Decimal::ZERO,
                Decimal::ZERO,
                percent_of(subtotal, self.igst_percent),
            ),
        };

        InvoiceTotals {
            subtotal,
            cgst,
            sgst,
            igst,
            total: subtotal + cgst + sgst + igst,
        }
    }
}

impl Default for GstRates {
    fn default() -> Self {
        Self::intra_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_intra_state_split() {
        let totals = GstRates::intra_state().apply(dec!(30000));
        assert_eq!(totals.cgst, dec!(2700));
        assert_eq!(totals.sgst, dec!(2700));
        assert_eq!(totals.igst, Decimal::ZERO);
        assert_eq!(totals.total, dec!(35400));
    }

    #[test]
    fn test_inter_state_uses_igst_only() {
        let totals = GstRates::inter_state().apply(dec!(30000));
        assert_eq!(totals.cgst, Decimal::ZERO);
        assert_eq!(totals.sgst, Decimal::ZERO);
        assert_eq!(totals.igst, dec!(5400));
        assert_eq!(totals.total, dec!(35400));
    }

    #[test]
    fn test_from_default_config_matches_standard_slab() {
        assert_eq!(
            GstRates::from_config(&BillingConfig::default()),
            GstRates::intra_state()
        );
    }

    #[test]
    fn test_fractional_subtotal_is_not_rounded() {
        let totals = GstRates::intra_state().apply(dec!(0.55));
        assert_eq!(totals.cgst, dec!(0.0495));
        assert_eq!(totals.rounded().cgst, dec!(0.05));
    }
}
