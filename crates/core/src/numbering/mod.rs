//! Sequential document numbering.
//!
//! Invoice numbers are scoped to the fiscal year (`SSI/INV/2024-25/001`);
//! credit notes share one global sequence (`CN-001`). Allocation reads the
//! greatest existing number, so the persistence layer must run it inside the
//! insert's transaction and retry when the insert hits the unique index.

pub mod error;
pub mod fiscal;
pub mod sequence;

pub use error::NumberingError;
pub use fiscal::FiscalYear;
pub use sequence::{
    DocumentKind, SEQUENCE_WIDTH, format_number, invoice_prefix, next_number, next_sequence,
};
