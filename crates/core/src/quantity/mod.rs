//! Quantity ledger for purchase-order line items.
//!
//! Derives the invoiceable, dispatchable and receivable balances of a line
//! item from its cumulative ordered/received/dispatched quantities, and
//! applies gate-pass movements under the invariant
//! `0 <= dispatched <= received <= ordered`.

pub mod balance;
pub mod error;
pub mod order;

#[cfg(test)]
mod balance_props;

pub use balance::LineItemQuantities;
pub use error::QuantityError;
pub use order::PurchaseOrderStatus;
