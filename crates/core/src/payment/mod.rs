//! Payment ledger.
//!
//! Settlement arithmetic for recording payments against sales and purchase
//! invoices, bulk settlement and the derived payment status
//! (`UNPAID -> PARTIALLY_PAID -> PAID`, `PAID` terminal).

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::PaymentError;
pub use service::PaymentService;
pub use types::{BulkSettlement, PaymentOutcome, PaymentStatus};
