//! Invoice issuance rules.
//!
//! Pure validation and totalling. The persistence layer loads the live
//! line-item quantities inside its transaction, calls
//! [`InvoiceService::prepare`], then numbers and stores the result.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::InvoiceError;
use super::gst::GstRates;
use super::types::{
    InvoiceStatus, LineAvailability, PreparedInvoice, PreparedLine, RequestedLine,
};

/// Invoice service for issuance validation and status overrides.
///
/// This service contains pure business logic with no database dependencies.
pub struct InvoiceService;

impl InvoiceService {
    /// Validate requested lines against live availability and compute totals.
    ///
    /// 1. At least one line is required
    /// 2. Every line item must appear in `availability` (i.e. belong to the PO)
    /// 3. `qty > 0` and `rate >= 0` per line
    /// 4. Quantities requested for the same line item are summed and checked
    ///    against its invoiceable balance
    /// 5. GST is applied to the subtotal; nothing is rounded here
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError` on the first rule violated.
    pub fn prepare(
        requested: &[RequestedLine],
        availability: &[LineAvailability],
        rates: &GstRates,
    ) -> Result<PreparedInvoice, InvoiceError> {
        if requested.is_empty() {
            return Err(InvoiceError::NoLineItems);
        }

        let mut lines = Vec::with_capacity(requested.len());
        let mut requested_per_item: Vec<(Uuid, Decimal)> = Vec::new();

        for line in requested {
            let available = Self::find(availability, line.po_line_item_id)?;

            if line.qty <= Decimal::ZERO {
                return Err(InvoiceError::NonPositiveQuantity {
                    part: available.part_number.clone(),
                });
            }
            if line.rate < Decimal::ZERO {
                return Err(InvoiceError::NegativeRate {
                    part: available.part_number.clone(),
                });
            }

            match requested_per_item
                .iter_mut()
                .find(|(id, _)| *id == line.po_line_item_id)
            {
                Some((_, qty)) => *qty += line.qty,
                None => requested_per_item.push((line.po_line_item_id, line.qty)),
            }

            lines.push(PreparedLine {
                po_line_item_id: line.po_line_item_id,
                qty: line.qty,
                rate: line.rate,
                amount: line.qty * line.rate,
            });
        }

        for (id, qty) in &requested_per_item {
            let available = Self::find(availability, *id)?;
            available.quantities.validate()?;
            let invoiceable = available.quantities.invoiceable_qty(available.invoiced_qty)?;

            if *qty > invoiceable {
                return Err(InvoiceError::QuantityExceedsBalance {
                    part: available.part_number.clone(),
                    requested: *qty,
                    available: invoiceable,
                });
            }
        }

        let subtotal = lines.iter().map(|l| l.amount).sum();
        let totals = rates.apply(subtotal);

        Ok(PreparedInvoice { lines, totals })
    }

    /// Check a manual status override.
    ///
    /// `PAID` and `CANCELLED` invoices keep their status. An invoice with
    /// money settled against it cannot be moved back to an unsettled status
    /// or cancelled.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvalidStatusTransition` if the change is not
    /// allowed.
    pub fn validate_status_override(
        from: InvoiceStatus,
        to: InvoiceStatus,
        paid_amount: Decimal,
    ) -> Result<(), InvoiceError> {
        if from == to {
            return Ok(());
        }

        let allowed = match to {
            _ if from.is_terminal() => false,
            InvoiceStatus::Draft
            | InvoiceStatus::Sent
            | InvoiceStatus::Unpaid
            | InvoiceStatus::Cancelled => paid_amount <= Decimal::ZERO,
            InvoiceStatus::PartiallyPaid | InvoiceStatus::Paid => true,
        };

        if allowed {
            Ok(())
        } else {
            Err(InvoiceError::InvalidStatusTransition { from, to })
        }
    }

    fn find(
        availability: &[LineAvailability],
        id: Uuid,
    ) -> Result<&LineAvailability, InvoiceError> {
        availability
            .iter()
            .find(|a| a.po_line_item_id == id)
            .ok_or(InvoiceError::LineItemNotOnOrder(id))
    }
}
