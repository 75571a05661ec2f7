//! Cumulative line-item quantities and the balances derived from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::QuantityError;

/// Cumulative physical quantities of one purchase-order line item.
///
/// Quantities only ever grow. `received` and `dispatched` are moved by the
/// gate-pass flow through [`record_inward`](Self::record_inward) and
/// [`record_outward`](Self::record_outward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemQuantities {
    /// Quantity on the purchase order.
    pub ordered: Decimal,
    /// Quantity received through inward gate passes.
    pub received: Decimal,
    /// Quantity dispatched through outward gate passes.
    pub dispatched: Decimal,
}

impl LineItemQuantities {
    /// Creates a new set of quantities.
    #[must_use]
    pub const fn new(ordered: Decimal, received: Decimal, dispatched: Decimal) -> Self {
        Self {
            ordered,
            received,
            dispatched,
        }
    }

    /// Quantities of a freshly placed order.
    #[must_use]
    pub const fn ordered_only(ordered: Decimal) -> Self {
        Self::new(ordered, Decimal::ZERO, Decimal::ZERO)
    }

    /// Checks `0 <= dispatched <= received <= ordered`.
    pub fn validate(&self) -> Result<(), QuantityError> {
        let consistent = self.dispatched >= Decimal::ZERO
            && self.dispatched <= self.received
            && self.received <= self.ordered;

        if consistent {
            Ok(())
        } else {
            Err(QuantityError::InconsistentQuantities {
                ordered: self.ordered,
                received: self.received,
                dispatched: self.dispatched,
            })
        }
    }

    /// Quantity still to be received.
    #[must_use]
    pub fn receive_balance(&self) -> Decimal {
        self.ordered - self.received
    }

    /// Quantity received but not yet dispatched.
    #[must_use]
    pub fn dispatch_balance(&self) -> Decimal {
        self.received - self.dispatched
    }

    /// Quantity dispatched but not yet invoiced.
    ///
    /// `invoiced` is the sum of every existing invoice line for this item.
    /// A negative result means more was invoiced than dispatched, which the
    /// issuance rules make impossible; it is reported as corruption.
    pub fn invoiceable_qty(&self, invoiced: Decimal) -> Result<Decimal, QuantityError> {
        let balance = self.dispatched - invoiced;
        if balance < Decimal::ZERO {
            return Err(QuantityError::OverInvoiced {
                dispatched: self.dispatched,
                invoiced,
            });
        }
        Ok(balance)
    }

    /// Applies an inward gate pass.
    pub fn record_inward(&self, qty: Decimal) -> Result<Self, QuantityError> {
        if qty <= Decimal::ZERO {
            return Err(QuantityError::NonPositiveQuantity);
        }
        let available = self.receive_balance();
        if qty > available {
            return Err(QuantityError::ExceedsReceiveBalance {
                requested: qty,
                available,
            });
        }
        Ok(Self {
            received: self.received + qty,
            ..*self
        })
    }

    /// Applies an outward gate pass.
    pub fn record_outward(&self, qty: Decimal) -> Result<Self, QuantityError> {
        if qty <= Decimal::ZERO {
            return Err(QuantityError::NonPositiveQuantity);
        }
        let available = self.dispatch_balance();
        if qty > available {
            return Err(QuantityError::ExceedsDispatchBalance {
                requested: qty,
                available,
            });
        }
        Ok(Self {
            dispatched: self.dispatched + qty,
            ..*self
        })
    }

    /// True once everything ordered has been dispatched.
    #[must_use]
    pub fn is_fully_dispatched(&self) -> bool {
        self.dispatched >= self.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balances() {
        let q = LineItemQuantities::new(dec!(100), dec!(80), dec!(60));
        assert_eq!(q.receive_balance(), dec!(20));
        assert_eq!(q.dispatch_balance(), dec!(20));
        assert_eq!(q.invoiceable_qty(Decimal::ZERO).unwrap(), dec!(60));
        assert_eq!(q.invoiceable_qty(dec!(45.5)).unwrap(), dec!(14.5));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_invoiceable_after_full_invoicing_is_zero() {
        let q = LineItemQuantities::new(dec!(100), dec!(60), dec!(60));
        assert_eq!(q.invoiceable_qty(dec!(60)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_over_invoicing_is_integrity_fault() {
        let q = LineItemQuantities::new(dec!(100), dec!(60), dec!(60));
        let err = q.invoiceable_qty(dec!(61)).unwrap_err();
        assert!(err.is_integrity_fault());
    }

    #[test]
    fn test_validate_rejects_dispatch_above_receipt() {
        let q = LineItemQuantities::new(dec!(100), dec!(10), dec!(20));
        assert!(matches!(
            q.validate(),
            Err(QuantityError::InconsistentQuantities { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_receipt_above_order() {
        let q = LineItemQuantities::new(dec!(10), dec!(11), dec!(0));
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_record_inward_and_outward() {
        let q = LineItemQuantities::ordered_only(dec!(100));
        let q = q.record_inward(dec!(70)).unwrap();
        assert_eq!(q.received, dec!(70));
        let q = q.record_outward(dec!(60)).unwrap();
        assert_eq!(q.dispatched, dec!(60));
        assert_eq!(q.dispatch_balance(), dec!(10));
        assert!(!q.is_fully_dispatched());
    }

    #[test]
    fn test_record_inward_rejects_excess() {
        let q = LineItemQuantities::new(dec!(100), dec!(90), dec!(0));
        assert!(matches!(
            q.record_inward(dec!(11)),
            Err(QuantityError::ExceedsReceiveBalance { available, .. }) if available == dec!(10)
        ));
    }

    #[test]
    fn test_record_outward_rejects_unreceived() {
        let q = LineItemQuantities::new(dec!(100), dec!(50), dec!(50));
        assert!(matches!(
            q.record_outward(dec!(1)),
            Err(QuantityError::ExceedsDispatchBalance { .. })
        ));
    }

    #[test]
    fn test_gate_pass_rejects_non_positive() {
        let q = LineItemQuantities::ordered_only(dec!(10));
        assert!(matches!(
            q.record_inward(Decimal::ZERO),
            Err(QuantityError::NonPositiveQuantity)
        ));
        assert!(matches!(
            q.record_outward(dec!(-1)),
            Err(QuantityError::NonPositiveQuantity)
        ));
    }
}
