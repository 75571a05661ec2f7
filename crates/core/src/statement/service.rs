//! Party statement aggregation.

use rust_decimal::Decimal;

use super::error::StatementError;
use super::types::{
    BalanceSide, DateRange, PartyStatement, PartySummary, StatementEntry, StatementLine,
};

/// Statement service for building a party's running-balance ledger.
pub struct StatementService;

impl StatementService {
    /// Opening balance from the party master: receivable minus payable.
    #[must_use]
    pub fn opening_balance(receivable: Decimal, payable: Decimal) -> Decimal {
        receivable - payable
    }

    /// Checks that a window is not inverted.
    pub fn validate_range(range: &DateRange) -> Result<(), StatementError> {
        match (range.from, range.to) {
            (Some(from), Some(to)) if from > to => {
                Err(StatementError::InvalidDateRange { from, to })
            }
            _ => Ok(()),
        }
    }

    /// Build a statement from unsorted lines.
    ///
    /// Lines outside `range` are dropped. The rest are ordered by date, then
    /// kind (invoices, payments, purchase invoices, supplier payments, credit
    /// notes), then
    /// reference, then id, and balanced starting from `opening_balance`.
    #[must_use]
    pub fn build(
        party: PartySummary,
        opening_balance: Decimal,
        lines: Vec<StatementLine>,
        range: &DateRange,
    ) -> PartyStatement {
        let mut lines: Vec<StatementLine> =
            lines.into_iter().filter(|l| range.contains(l.date)).collect();

        lines.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.kind.cmp(&b.kind))
                .then_with(|| a.reference.cmp(&b.reference))
                .then(a.id.cmp(&b.id))
        });

        let mut balance = opening_balance;
        let entries: Vec<StatementEntry> = lines
            .into_iter()
            .map(|line| {
                balance = balance + line.debit - line.credit;
                StatementEntry {
                    id: line.id,
                    date: line.date,
                    kind: line.kind,
                    reference: line.reference,
                    description: line.description,
                    debit: line.debit,
                    credit: line.credit,
                    balance,
                    side: BalanceSide::of(balance),
                }
            })
            .collect();

        let closing_balance = entries.last().map_or(opening_balance, |e| e.balance);

        PartyStatement {
            party,
            entries,
            opening_balance,
            closing_balance,
            closing_side: BalanceSide::of(closing_balance),
        }
    }
}
