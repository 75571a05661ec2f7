//! Property-based tests for invoice issuance.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::gst::GstRates;
use super::service::InvoiceService;
use super::types::{LineAvailability, RequestedLine};
use crate::quantity::LineItemQuantities;

fn availability(dispatched: i64, invoiced: i64) -> LineAvailability {
    let dispatched = Decimal::new(dispatched, 2);
    LineAvailability {
        po_line_item_id: Uuid::from_u128(1),
        part_number: "P-1".to_string(),
        quantities: LineItemQuantities::new(dispatched, dispatched, dispatched),
        invoiced_qty: Decimal::new(invoiced, 2),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// An accepted invoice never leaves the line over-invoiced.
    #[test]
    fn prop_accepted_invoice_keeps_balance_non_negative(
        dispatched in 1i64..100_000,
        invoiced_pct in 0i64..=100,
        qty in 1i64..100_000,
        rate in 0i64..1_000_000,
    ) {
        let invoiced = dispatched * invoiced_pct / 100;
        let avail = availability(dispatched, invoiced);
        let line = RequestedLine {
            po_line_item_id: avail.po_line_item_id,
            qty: Decimal::new(qty, 2),
            rate: Decimal::new(rate, 2),
        };

        let result = InvoiceService::prepare(&[line], std::slice::from_ref(&avail), &GstRates::default());
        let remaining = avail.quantities.dispatched - avail.invoiced_qty - Decimal::new(qty, 2);

        match result {
            Ok(_) => prop_assert!(remaining >= Decimal::ZERO),
            Err(_) => prop_assert!(remaining < Decimal::ZERO),
        }
    }

    /// Persisted totals always satisfy `total = subtotal + cgst + sgst + igst`.
    #[test]
    fn prop_rounded_total_is_sum_of_components(
        qty in 1i64..100_000,
        rate in 0i64..10_000_000,
        inter_state in any::<bool>(),
    ) {
        let avail = availability(100_000, 0);
        let line = RequestedLine {
            po_line_item_id: avail.po_line_item_id,
            qty: Decimal::new(qty, 2),
            rate: Decimal::new(rate, 3),
        };
        let rates = if inter_state { GstRates::inter_state() } else { GstRates::intra_state() };

        let prepared = InvoiceService::prepare(&[line], &[avail], &rates).unwrap();
        let t = prepared.totals.rounded();

        prop_assert_eq!(t.total, t.subtotal + t.cgst + t.sgst + t.igst);
        prop_assert!(t.subtotal.scale() <= 2);
        prop_assert!(t.total >= t.subtotal);
    }
}
