//! Receivable and payable aging.

pub mod service;
pub mod types;

pub use service::AgingService;
pub use types::{AgingBucket, AgingRow, AgingSide, OutstandingDocument};
