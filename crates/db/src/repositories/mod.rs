//! Repository abstractions for data access.
//!
//! Every write runs in its own transaction; helpers that take part in a
//! write receive the `&DatabaseTransaction` explicitly.

pub mod aging;
pub mod audit;
pub mod credit_note;
pub mod invoice;
mod numbering;
pub mod party;
pub mod payment;
pub mod purchase_invoice;
pub mod purchase_order;
pub mod statement;

pub use aging::AgingRepository;
pub use audit::AuditRepository;
pub use credit_note::{CreateCreditNoteInput, CreditNoteRepository, CreditNoteWithItems};
pub use invoice::{CreateInvoiceInput, InvoiceRepository, InvoiceWithLines};
pub use party::{CreatePartyInput, PartyError, PartyRepository};
pub use payment::{BULK_PAYMENT_MODE, PaymentRepository, RecordPaymentInput};
pub use purchase_invoice::{
    CreatePurchaseInvoiceInput, PurchaseInvoiceError, PurchaseInvoiceRepository,
    RecordPurchasePaymentInput,
};
pub use purchase_order::{
    CreatePurchaseOrderInput, LineItemWithBalance, NewLineItem, PurchaseOrderError,
    PurchaseOrderRepository, PurchaseOrderWithDispatches, PurchaseOrderWithLines,
};
pub use statement::StatementRepository;
