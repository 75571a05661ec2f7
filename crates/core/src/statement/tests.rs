//! Tests for the statement module.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::service::StatementService;
use super::types::{
    BalanceSide, DateRange, EntryKind, PartyKind, PartySummary, StatementLine,
};

fn party() -> PartySummary {
    PartySummary {
        id: Uuid::from_u128(42),
        name: "Axle Division".to_string(),
        gstin: Some("29ABCDE1234F1Z5".to_string()),
        kind: PartyKind::Customer,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn line(
    id: u128,
    on: NaiveDate,
    kind: EntryKind,
    reference: &str,
    debit: Decimal,
    credit: Decimal,
) -> StatementLine {
    StatementLine {
        id: Uuid::from_u128(id),
        date: on,
        kind,
        reference: reference.to_string(),
        description: String::new(),
        debit,
        credit,
    }
}

#[test]
fn test_running_balance_from_opening() {
    let lines = vec![
        line(3, date(2025, 5, 10), EntryKind::Payment, "UTR-1", Decimal::ZERO, dec!(35400)),
        line(1, date(2025, 5, 1), EntryKind::Invoice, "SSI/INV/2025-26/001", dec!(35400), Decimal::ZERO),
        line(4, date(2025, 5, 20), EntryKind::PurchaseInvoice, "SUP-77", Decimal::ZERO, dec!(2000)),
    ];

    let opening = StatementService::opening_balance(dec!(1000), dec!(250));
    let st = StatementService::build(party(), opening, lines, &DateRange::default());

    assert_eq!(st.opening_balance, dec!(750));
    let balances: Vec<Decimal> = st.entries.iter().map(|e| e.balance).collect();
    assert_eq!(balances, vec![dec!(36150), dec!(750), dec!(-1250)]);
    assert_eq!(st.closing_balance, dec!(-1250));
    assert_eq!(st.closing_side, BalanceSide::Cr);
    assert_eq!(st.entries[0].side, BalanceSide::Dr);
}

#[test]
fn test_same_day_tie_break() {
    let on = date(2025, 6, 1);
    let lines = vec![
        line(9, on, EntryKind::CreditNote, "CN-001", Decimal::ZERO, dec!(10)),
        line(10, on, EntryKind::SupplierPayment, "NEFT-9", dec!(10), Decimal::ZERO),
        line(8, on, EntryKind::PurchaseInvoice, "SUP-1", Decimal::ZERO, dec!(10)),
        line(7, on, EntryKind::Payment, "B", Decimal::ZERO, dec!(10)),
        line(6, on, EntryKind::Payment, "A", Decimal::ZERO, dec!(10)),
        line(5, on, EntryKind::Invoice, "SSI/INV/2025-26/002", dec!(100), Decimal::ZERO),
    ];

    let st = StatementService::build(party(), Decimal::ZERO, lines, &DateRange::default());
    let order: Vec<u128> = st.entries.iter().map(|e| e.id.as_u128()).collect();
    assert_eq!(order, vec![5, 6, 7, 8, 10, 9]);
}

#[test]
fn test_empty_statement_closes_at_opening() {
    let st = StatementService::build(party(), dec!(-300), Vec::new(), &DateRange::default());
    assert!(st.entries.is_empty());
    assert_eq!(st.closing_balance, dec!(-300));
    assert_eq!(st.closing_side, BalanceSide::Cr);
}

#[test]
fn test_date_window_is_inclusive_and_keeps_opening() {
    let lines = vec![
        line(1, date(2025, 4, 30), EntryKind::Invoice, "I1", dec!(100), Decimal::ZERO),
        line(2, date(2025, 5, 1), EntryKind::Invoice, "I2", dec!(200), Decimal::ZERO),
        line(3, date(2025, 5, 31), EntryKind::Invoice, "I3", dec!(300), Decimal::ZERO),
        line(4, date(2025, 6, 1), EntryKind::Invoice, "I4", dec!(400), Decimal::ZERO),
    ];
    let range = DateRange::new(Some(date(2025, 5, 1)), Some(date(2025, 5, 31)));

    let st = StatementService::build(party(), dec!(50), lines, &range);

    assert_eq!(st.entries.len(), 2);
    assert_eq!(st.opening_balance, dec!(50));
    assert_eq!(st.closing_balance, dec!(550));
}

#[test]
fn test_inverted_range_rejected() {
    let range = DateRange::new(Some(date(2025, 6, 1)), Some(date(2025, 5, 1)));
    assert!(StatementService::validate_range(&range).is_err());
    assert!(StatementService::validate_range(&DateRange::default()).is_ok());
}

proptest! {
    /// Closing balance equals opening plus total debits minus total credits,
    /// whatever order the lines arrive in.
    #[test]
    fn prop_closing_balance_is_net_movement(
        opening in -1_000_000i64..1_000_000,
        amounts in prop::collection::vec((0u32..60, -100_000i64..100_000), 0..40),
    ) {
        let base = date(2025, 4, 1);
        let lines: Vec<StatementLine> = amounts
            .iter()
            .enumerate()
            .map(|(i, (offset, amount))| {
                let amount = Decimal::new(*amount, 2);
                let (kind, debit, credit) = if amount >= Decimal::ZERO {
                    (EntryKind::Invoice, amount, Decimal::ZERO)
                } else {
                    (EntryKind::Payment, Decimal::ZERO, -amount)
                };
                line(i as u128, base + chrono::Days::new(u64::from(*offset)), kind, "R", debit, credit)
            })
            .collect();

        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
        let opening = Decimal::new(opening, 2);

        let st = StatementService::build(party(), opening, lines, &DateRange::default());

        prop_assert_eq!(st.closing_balance, opening + total_debit - total_credit);
        for pair in st.entries.windows(2) {
            prop_assert!(pair[0].date <= pair[1].date);
        }
    }
}
