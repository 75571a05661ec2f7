//! Invoice issuance.
//!
//! Validates requested quantities against each line item's invoiceable
//! balance, computes GST and produces the totals to persist. Numbering and
//! storage happen in the persistence layer inside one transaction.

pub mod error;
pub mod gst;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::InvoiceError;
pub use gst::GstRates;
pub use service::InvoiceService;
pub use types::{
    InvoiceStatus, InvoiceTotals, LineAvailability, PreparedInvoice, PreparedLine, RequestedLine,
};
