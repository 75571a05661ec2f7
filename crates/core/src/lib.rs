//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `quantity` - Line-item quantity ledger and gate-pass movements
//! - `numbering` - Fiscal years and sequential document numbers
//! - `invoice` - Invoice issuance and GST
//! - `payment` - Payment settlement and status derivation
//! - `credit_note` - Credit note issuance and adjustment
//! - `statement` - Party running-balance statements
//! - `aging` - Receivable and payable aging buckets

pub mod aging;
pub mod credit_note;
pub mod invoice;
pub mod numbering;
pub mod payment;
pub mod quantity;
pub mod statement;
