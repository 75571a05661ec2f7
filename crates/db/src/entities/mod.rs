//! `SeaORM` entity definitions.

pub mod audit_logs;
pub mod credit_note_items;
pub mod credit_notes;
pub mod invoice_line_items;
pub mod invoices;
pub mod parties;
pub mod payments;
pub mod po_line_items;
pub mod purchase_invoices;
pub mod purchase_orders;
pub mod purchase_payments;
pub mod sea_orm_active_enums;
