//! Credit notes.
//!
//! Credit notes are issued per party independently of purchase orders and
//! are applied to exactly one invoice, once.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::CreditNoteError;
pub use service::CreditNoteService;
pub use types::{
    Adjustment, CreditNoteItemInput, CreditNoteStatus, CreditTarget, PreparedCreditNote,
    PreparedCreditNoteItem,
};
