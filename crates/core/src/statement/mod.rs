//! Party statement aggregation.
//!
//! Merges sales invoices, payments, purchase invoices, supplier payments and
//! credit notes of one party into a dated ledger with a running balance.
//! Positive balances are receivable (Dr), negative balances payable (Cr).

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::StatementError;
pub use service::StatementService;
pub use types::*;
