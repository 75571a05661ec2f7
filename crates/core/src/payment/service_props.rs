//! Property-based tests for payment settlement.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::PaymentService;
use super::types::PaymentStatus;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A sequence of accepted payments never decreases the paid amount and
    /// keeps `balance_due = total - paid`.
    #[test]
    fn prop_paid_amount_is_monotonic(
        total in 1i64..10_000_000,
        payments in prop::collection::vec(1i64..5_000_000, 1..10),
    ) {
        let total = Decimal::new(total, 2);
        let mut settled = Decimal::ZERO;

        for p in payments {
            let amount = Decimal::new(p, 2);
            match PaymentService::apply(total, settled, amount) {
                Ok(outcome) => {
                    prop_assert!(outcome.paid_amount > settled);
                    prop_assert_eq!(outcome.balance_due, total - outcome.paid_amount);
                    prop_assert!(outcome.balance_due >= Decimal::ZERO);
                    settled = outcome.paid_amount;
                }
                Err(_) => prop_assert!(amount > total - settled),
            }
        }

        let status = PaymentService::derive_status(total, settled);
        prop_assert_eq!(status == PaymentStatus::Paid, settled == total);
    }
}
