//! Payment settlement rules.

use rust_decimal::Decimal;
use tally_shared::types::non_negative;
use uuid::Uuid;

use super::error::PaymentError;
use super::types::{BulkSettlement, PaymentOutcome, PaymentStatus};
use crate::invoice::InvoiceStatus;

/// Payment service for settlement arithmetic.
///
/// Works on sales and purchase invoices alike. `settled` is everything
/// already credited to the invoice: received payments plus applied credit.
pub struct PaymentService;

impl PaymentService {
    /// Derive the settlement status from a total and the amount settled.
    #[must_use]
    pub fn derive_status(total: Decimal, settled: Decimal) -> PaymentStatus {
        if settled >= total {
            PaymentStatus::Paid
        } else if settled > Decimal::ZERO {
            PaymentStatus::PartiallyPaid
        } else {
            PaymentStatus::Unpaid
        }
    }

    /// Amounts to persist once `settled` has been credited.
    #[must_use]
    pub fn settle(total: Decimal, settled: Decimal) -> PaymentOutcome {
        PaymentOutcome {
            paid_amount: settled,
            balance_due: non_negative(total - settled),
            status: Self::derive_status(total, settled),
        }
    }

    /// Apply one payment to an invoice.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NonPositiveAmount` for `amount <= 0` and
    /// `PaymentError::ExceedsBalance` if the payment would overpay.
    pub fn apply(
        total: Decimal,
        settled: Decimal,
        amount: Decimal,
    ) -> Result<PaymentOutcome, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount);
        }

        let remaining = non_negative(total - settled);
        if amount > remaining {
            return Err(PaymentError::ExceedsBalance { remaining });
        }

        Ok(Self::settle(total, settled + amount))
    }

    /// Settle an invoice in full as part of a bulk operation.
    ///
    /// The synthesized payment covers the outstanding remainder; none is
    /// produced when nothing is owed.
    #[must_use]
    pub fn settle_in_full(total: Decimal, settled: Decimal) -> BulkSettlement {
        let remainder = total - settled;
        BulkSettlement {
            payment_amount: (remainder > Decimal::ZERO).then_some(remainder),
            outcome: PaymentOutcome {
                paid_amount: total,
                balance_due: Decimal::ZERO,
                status: PaymentStatus::Paid,
            },
        }
    }

    /// Returns true if a bulk settlement should touch an invoice in `status`.
    #[must_use]
    pub fn is_bulk_settleable(status: InvoiceStatus) -> bool {
        !status.is_terminal()
    }

    /// Validate and de-duplicate the ids of a bulk settlement.
    ///
    /// Order of first appearance is kept.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::EmptyBatch` or `PaymentError::TooManyInvoices`.
    pub fn validate_bulk(ids: &[Uuid], limit: usize) -> Result<Vec<Uuid>, PaymentError> {
        let mut distinct: Vec<Uuid> = Vec::with_capacity(ids.len());
        for id in ids {
            if !distinct.contains(id) {
                distinct.push(*id);
            }
        }

        if distinct.is_empty() {
            return Err(PaymentError::EmptyBatch);
        }
        if distinct.len() > limit {
            return Err(PaymentError::TooManyInvoices {
                count: distinct.len(),
                limit,
            });
        }

        Ok(distinct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_full_payment() {
        let outcome = PaymentService::apply(dec!(35400), Decimal::ZERO, dec!(35400)).unwrap();
        assert_eq!(outcome.paid_amount, dec!(35400));
        assert_eq!(outcome.balance_due, Decimal::ZERO);
        assert_eq!(outcome.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_partial_then_full() {
        let first = PaymentService::apply(dec!(1000), Decimal::ZERO, dec!(400)).unwrap();
        assert_eq!(first.status, PaymentStatus::PartiallyPaid);
        assert_eq!(first.balance_due, dec!(600));

        let second = PaymentService::apply(dec!(1000), first.paid_amount, dec!(600)).unwrap();
        assert_eq!(second.status, PaymentStatus::Paid);
        assert_eq!(second.balance_due, Decimal::ZERO);
    }

    #[test]
    fn test_overpayment_rejected() {
        let err = PaymentService::apply(dec!(1000), dec!(700), dec!(300.01)).unwrap_err();
        match err {
            PaymentError::ExceedsBalance { remaining } => assert_eq!(remaining, dec!(300)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[case(Decimal::ZERO)]
    #[case(dec!(-5))]
    fn test_non_positive_amount_rejected(#[case] amount: Decimal) {
        assert!(matches!(
            PaymentService::apply(dec!(1000), Decimal::ZERO, amount),
            Err(PaymentError::NonPositiveAmount)
        ));
    }

    #[rstest]
    #[case(dec!(100), Decimal::ZERO, PaymentStatus::Unpaid)]
    #[case(dec!(100), dec!(0.01), PaymentStatus::PartiallyPaid)]
    #[case(dec!(100), dec!(100), PaymentStatus::Paid)]
    #[case(dec!(100), dec!(120), PaymentStatus::Paid)]
    fn test_derive_status(
        #[case] total: Decimal,
        #[case] settled: Decimal,
        #[case] expected: PaymentStatus,
    ) {
        assert_eq!(PaymentService::derive_status(total, settled), expected);
    }

    #[test]
    fn test_settle_in_full() {
        let bulk = PaymentService::settle_in_full(dec!(1000), dec!(250));
        assert_eq!(bulk.payment_amount, Some(dec!(750)));
        assert_eq!(bulk.outcome.paid_amount, dec!(1000));
        assert_eq!(bulk.outcome.balance_due, Decimal::ZERO);
        assert_eq!(bulk.outcome.status, PaymentStatus::Paid);

        let nothing_owed = PaymentService::settle_in_full(dec!(1000), dec!(1000));
        assert_eq!(nothing_owed.payment_amount, None);
    }

    #[test]
    fn test_bulk_skips_terminal_invoices() {
        assert!(PaymentService::is_bulk_settleable(InvoiceStatus::Sent));
        assert!(PaymentService::is_bulk_settleable(InvoiceStatus::PartiallyPaid));
        assert!(!PaymentService::is_bulk_settleable(InvoiceStatus::Paid));
        assert!(!PaymentService::is_bulk_settleable(InvoiceStatus::Cancelled));
    }

    #[test]
    fn test_validate_bulk() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_eq!(PaymentService::validate_bulk(&[a, b, a], 100).unwrap(), vec![a, b]);
        assert!(matches!(
            PaymentService::validate_bulk(&[], 100),
            Err(PaymentError::EmptyBatch)
        ));
        assert!(matches!(
            PaymentService::validate_bulk(&[a, b], 1),
            Err(PaymentError::TooManyInvoices { count: 2, limit: 1 })
        ));
    }
}
