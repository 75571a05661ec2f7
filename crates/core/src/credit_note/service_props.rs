//! Property-based tests for credit adjustments.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::service::CreditNoteService;
use super::types::{CreditNoteStatus, CreditTarget};
use crate::invoice::InvoiceStatus;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Adjustment conserves money: what is applied moves from balance to paid.
    #[test]
    fn prop_adjustment_conserves_total(
        total in 1i64..10_000_000,
        paid_pct in 0i64..100,
        credit in 1i64..10_000_000,
    ) {
        let total = Decimal::new(total, 2);
        let paid = (total * Decimal::new(paid_pct, 2)).round_dp(2);
        let balance = total - paid;
        prop_assume!(balance > Decimal::ZERO);
        let party = Uuid::from_u128(7);
        let invoice = CreditTarget {
            invoice_id: Uuid::from_u128(1),
            party_id: party,
            status: InvoiceStatus::Unpaid,
            paid_amount: paid,
            balance_due: balance,
        };
        let credit = Decimal::new(credit, 2);

        let adj = CreditNoteService::adjust(CreditNoteStatus::Pending, party, credit, &invoice).unwrap();

        prop_assert_eq!(adj.paid_amount + adj.balance_due, total);
        prop_assert_eq!(adj.applied + adj.excess, credit);
        prop_assert!(adj.paid_amount >= paid);
        prop_assert!(adj.balance_due >= Decimal::ZERO);
    }
}
