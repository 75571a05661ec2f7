//! Property-based tests for line-item quantity balances.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::LineItemQuantities;

/// Strategy for a consistent set of quantities with up to 3 decimal places.
fn arb_quantities() -> impl Strategy<Value = LineItemQuantities> {
    (0i64..1_000_000, 0i64..1_000_000, 0i64..1_000_000).prop_map(|(a, b, c)| {
        let mut v = [a, b, c];
        v.sort_unstable();
        LineItemQuantities::new(
            Decimal::new(v[2], 3),
            Decimal::new(v[1], 3),
            Decimal::new(v[0], 3),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Balances partition the ordered quantity.
    #[test]
    fn prop_balances_partition_order(q in arb_quantities()) {
        prop_assert!(q.validate().is_ok());
        prop_assert_eq!(
            q.receive_balance() + q.dispatch_balance() + q.dispatched,
            q.ordered
        );
        prop_assert!(q.receive_balance() >= Decimal::ZERO);
        prop_assert!(q.dispatch_balance() >= Decimal::ZERO);
    }

    /// Invoicing up to the dispatched quantity never goes negative.
    #[test]
    fn prop_invoiceable_never_negative(q in arb_quantities(), pct in 0u32..=100) {
        let invoiced = q.dispatched * Decimal::from(pct) / Decimal::ONE_HUNDRED;
        let invoiceable = q.invoiceable_qty(invoiced).unwrap();
        prop_assert!(invoiceable >= Decimal::ZERO);
        prop_assert_eq!(invoiceable + invoiced, q.dispatched);
    }

    /// Any accepted gate pass keeps the quantity invariant.
    #[test]
    fn prop_gate_passes_preserve_invariant(
        q in arb_quantities(),
        inward in 1i64..2_000_000,
        outward in 1i64..2_000_000,
    ) {
        let after_in = q.record_inward(Decimal::new(inward, 3));
        if let Ok(next) = after_in {
            prop_assert!(next.validate().is_ok());
            prop_assert!(next.received > q.received);
        }

        let after_out = q.record_outward(Decimal::new(outward, 3));
        if let Ok(next) = after_out {
            prop_assert!(next.validate().is_ok());
            prop_assert!(next.dispatched > q.dispatched);
        }
    }
}
