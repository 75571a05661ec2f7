//! Credit note rules.

use rust_decimal::Decimal;
use tally_shared::types::{non_negative, round_money};
use uuid::Uuid;

use super::error::CreditNoteError;
use super::types::{
    Adjustment, CreditNoteItemInput, CreditNoteStatus, CreditTarget, PreparedCreditNote,
    PreparedCreditNoteItem,
};
use crate::invoice::InvoiceStatus;
use crate::payment::PaymentStatus;

/// Credit note service for issuance, adjustment and cancellation.
///
/// This service contains pure business logic with no database dependencies.
pub struct CreditNoteService;

impl CreditNoteService {
    /// Validate items and total a new credit note.
    ///
    /// Each item amount is rounded to paise first; the total is the sum of
    /// the rounded item amounts.
    ///
    /// # Errors
    ///
    /// Returns `CreditNoteError` if there are no items, an item has a
    /// non-positive quantity or negative rate, or the total is zero.
    pub fn prepare(items: &[CreditNoteItemInput]) -> Result<PreparedCreditNote, CreditNoteError> {
        if items.is_empty() {
            return Err(CreditNoteError::NoItems);
        }

        let mut prepared = Vec::with_capacity(items.len());
        for item in items {
            if item.qty <= Decimal::ZERO {
                return Err(CreditNoteError::NonPositiveQuantity(item.description.clone()));
            }
            if item.rate < Decimal::ZERO {
                return Err(CreditNoteError::NegativeRate(item.description.clone()));
            }
            prepared.push(PreparedCreditNoteItem {
                description: item.description.clone(),
                qty: item.qty,
                rate: item.rate,
                amount: round_money(item.qty * item.rate),
            });
        }

        let total: Decimal = prepared.iter().map(|i| i.amount).sum();
        if total <= Decimal::ZERO {
            return Err(CreditNoteError::ZeroTotal);
        }

        Ok(PreparedCreditNote {
            items: prepared,
            total,
        })
    }

    /// Apply a credit note to an invoice.
    ///
    /// The credit applied is capped at the invoice balance; the excess is
    /// reported but not carried forward.
    ///
    /// # Errors
    ///
    /// Returns `CreditNoteError` if the note is not `PENDING`, belongs to a
    /// different party, or the invoice is cancelled or already settled.
    pub fn adjust(
        status: CreditNoteStatus,
        party_id: Uuid,
        credit: Decimal,
        invoice: &CreditTarget,
    ) -> Result<Adjustment, CreditNoteError> {
        match status {
            CreditNoteStatus::Pending => {}
            CreditNoteStatus::Adjusted => return Err(CreditNoteError::AlreadyAdjusted),
            CreditNoteStatus::Cancelled => return Err(CreditNoteError::Cancelled),
        }
        if invoice.party_id != party_id {
            return Err(CreditNoteError::PartyMismatch);
        }
        if invoice.status == InvoiceStatus::Cancelled {
            return Err(CreditNoteError::InvoiceCancelled(invoice.invoice_id));
        }
        // PAID is terminal even when a manual override left a balance.
        if invoice.status == InvoiceStatus::Paid || invoice.balance_due <= Decimal::ZERO {
            return Err(CreditNoteError::InvoiceSettled(invoice.invoice_id));
        }

        let applied = credit.min(invoice.balance_due);
        let paid_amount = invoice.paid_amount + applied;
        let balance_due = non_negative(invoice.balance_due - credit);

        let status = if balance_due <= Decimal::ZERO {
            PaymentStatus::Paid
        } else if paid_amount > Decimal::ZERO {
            PaymentStatus::PartiallyPaid
        } else {
            PaymentStatus::Unpaid
        };

        Ok(Adjustment {
            applied,
            excess: credit - applied,
            paid_amount,
            balance_due,
            status,
        })
    }

    /// Check that a credit note may be cancelled.
    ///
    /// # Errors
    ///
    /// Returns `CreditNoteError::InvalidCancellation` unless the note is
    /// `PENDING`.
    pub fn cancel(status: CreditNoteStatus) -> Result<CreditNoteStatus, CreditNoteError> {
        match status {
            CreditNoteStatus::Pending => Ok(CreditNoteStatus::Cancelled),
            other => Err(CreditNoteError::InvalidCancellation(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn target(party: Uuid, paid: Decimal, balance: Decimal) -> CreditTarget {
        CreditTarget {
            invoice_id: Uuid::new_v4(),
            party_id: party,
            status: InvoiceStatus::Unpaid,
            paid_amount: paid,
            balance_due: balance,
        }
    }

    fn item(description: &str, qty: Decimal, rate: Decimal) -> CreditNoteItemInput {
        CreditNoteItemInput {
            description: description.to_string(),
            qty,
            rate,
        }
    }

    #[test]
    fn test_prepare_totals_items() {
        let prepared = CreditNoteService::prepare(&[
            item("Rejected brackets", dec!(4), dec!(500)),
            item("Short weight", dec!(1.5), dec!(2000)),
        ])
        .unwrap();
        assert_eq!(prepared.items[0].amount, dec!(2000));
        assert_eq!(prepared.items[1].amount, dec!(3000));
        assert_eq!(prepared.total, dec!(5000));
    }

    #[test]
    fn test_total_is_sum_of_rounded_items() {
        // 0.333 x 1.55 = 0.51615 per line; unrounded the pair would total 1.03.
        let prepared = CreditNoteService::prepare(&[
            item("Washer rework", dec!(0.333), dec!(1.55)),
            item("Washer rework", dec!(0.333), dec!(1.55)),
        ])
        .unwrap();
        assert_eq!(prepared.items[0].amount, dec!(0.52));
        assert_eq!(prepared.items[1].amount, dec!(0.52));
        assert_eq!(prepared.total, dec!(1.04));
    }

    #[test]
    fn test_prepare_rejects_bad_items() {
        assert!(matches!(
            CreditNoteService::prepare(&[]),
            Err(CreditNoteError::NoItems)
        ));
        assert!(matches!(
            CreditNoteService::prepare(&[item("x", Decimal::ZERO, dec!(1))]),
            Err(CreditNoteError::NonPositiveQuantity(_))
        ));
        assert!(matches!(
            CreditNoteService::prepare(&[item("x", dec!(1), dec!(-1))]),
            Err(CreditNoteError::NegativeRate(_))
        ));
        assert!(matches!(
            CreditNoteService::prepare(&[item("x", dec!(1), Decimal::ZERO)]),
            Err(CreditNoteError::ZeroTotal)
        ));
    }

    #[test]
    fn test_partial_adjustment() {
        let party = Uuid::new_v4();
        let adj = CreditNoteService::adjust(
            CreditNoteStatus::Pending,
            party,
            dec!(5000),
            &target(party, Decimal::ZERO, dec!(8000)),
        )
        .unwrap();

        assert_eq!(adj.applied, dec!(5000));
        assert_eq!(adj.excess, Decimal::ZERO);
        assert_eq!(adj.paid_amount, dec!(5000));
        assert_eq!(adj.balance_due, dec!(3000));
        assert_eq!(adj.status, PaymentStatus::PartiallyPaid);
    }

    #[test]
    fn test_excess_credit_is_capped() {
        let party = Uuid::new_v4();
        let adj = CreditNoteService::adjust(
            CreditNoteStatus::Pending,
            party,
            dec!(5000),
            &target(party, dec!(7000), dec!(3000)),
        )
        .unwrap();

        assert_eq!(adj.applied, dec!(3000));
        assert_eq!(adj.excess, dec!(2000));
        assert_eq!(adj.paid_amount, dec!(10000));
        assert_eq!(adj.balance_due, Decimal::ZERO);
        assert_eq!(adj.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_adjustment_guards() {
        let party = Uuid::new_v4();
        let open = target(party, Decimal::ZERO, dec!(100));

        assert!(matches!(
            CreditNoteService::adjust(CreditNoteStatus::Adjusted, party, dec!(10), &open),
            Err(CreditNoteError::AlreadyAdjusted)
        ));
        assert!(matches!(
            CreditNoteService::adjust(CreditNoteStatus::Cancelled, party, dec!(10), &open),
            Err(CreditNoteError::Cancelled)
        ));
        assert!(matches!(
            CreditNoteService::adjust(CreditNoteStatus::Pending, Uuid::new_v4(), dec!(10), &open),
            Err(CreditNoteError::PartyMismatch)
        ));

        let cancelled = CreditTarget {
            status: InvoiceStatus::Cancelled,
            ..open
        };
        assert!(matches!(
            CreditNoteService::adjust(CreditNoteStatus::Pending, party, dec!(10), &cancelled),
            Err(CreditNoteError::InvoiceCancelled(_))
        ));

        let settled = target(party, dec!(100), Decimal::ZERO);
        assert!(matches!(
            CreditNoteService::adjust(CreditNoteStatus::Pending, party, dec!(10), &settled),
            Err(CreditNoteError::InvoiceSettled(_))
        ));

        let forced_paid = CreditTarget {
            status: InvoiceStatus::Paid,
            ..target(party, Decimal::ZERO, dec!(5900))
        };
        assert!(matches!(
            CreditNoteService::adjust(CreditNoteStatus::Pending, party, dec!(10), &forced_paid),
            Err(CreditNoteError::InvoiceSettled(_))
        ));
    }

    #[test]
    fn test_cancel_only_from_pending() {
        assert_eq!(
            CreditNoteService::cancel(CreditNoteStatus::Pending).unwrap(),
            CreditNoteStatus::Cancelled
        );
        assert!(CreditNoteService::cancel(CreditNoteStatus::Adjusted).is_err());
        assert!(CreditNoteService::cancel(CreditNoteStatus::Cancelled).is_err());
    }
}
