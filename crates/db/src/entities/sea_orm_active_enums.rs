//! `SeaORM` active enums, stored as strings so the schema stays portable
//! between Postgres and SQLite.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::credit_note::CreditNoteStatus as CoreCreditNoteStatus;
use tally_core::invoice::InvoiceStatus as CoreInvoiceStatus;
use tally_core::payment::PaymentStatus as CorePaymentStatus;
use tally_core::quantity::PurchaseOrderStatus as CorePurchaseOrderStatus;
use tally_core::statement::PartyKind as CorePartyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "supplier")]
    Supplier,
    #[sea_orm(string_value = "both")]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "PARTIALLY_FULFILLED")]
    PartiallyFulfilled,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "SENT")]
    Sent,
    #[sea_orm(string_value = "UNPAID")]
    Unpaid,
    #[sea_orm(string_value = "PARTIALLY_PAID")]
    PartiallyPaid,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "UNPAID")]
    Unpaid,
    #[sea_orm(string_value = "PARTIALLY_PAID")]
    PartiallyPaid,
    #[sea_orm(string_value = "PAID")]
    Paid,
}

/// Status of a payment row. Payments are append-only and always received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentRecordStatus {
    #[sea_orm(string_value = "RECEIVED")]
    Received,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditNoteStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ADJUSTED")]
    Adjusted,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl From<PartyKind> for CorePartyKind {
    fn from(kind: PartyKind) -> Self {
        match kind {
            PartyKind::Customer => Self::Customer,
            PartyKind::Supplier => Self::Supplier,
            PartyKind::Both => Self::Both,
        }
    }
}

impl From<CorePartyKind> for PartyKind {
    fn from(kind: CorePartyKind) -> Self {
        match kind {
            CorePartyKind::Customer => Self::Customer,
            CorePartyKind::Supplier => Self::Supplier,
            CorePartyKind::Both => Self::Both,
        }
    }
}

impl From<PurchaseOrderStatus> for CorePurchaseOrderStatus {
    fn from(status: PurchaseOrderStatus) -> Self {
        match status {
            PurchaseOrderStatus::Open => Self::Open,
            PurchaseOrderStatus::PartiallyFulfilled => Self::PartiallyFulfilled,
            PurchaseOrderStatus::Completed => Self::Completed,
            PurchaseOrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CorePurchaseOrderStatus> for PurchaseOrderStatus {
    fn from(status: CorePurchaseOrderStatus) -> Self {
        match status {
            CorePurchaseOrderStatus::Open => Self::Open,
            CorePurchaseOrderStatus::PartiallyFulfilled => Self::PartiallyFulfilled,
            CorePurchaseOrderStatus::Completed => Self::Completed,
            CorePurchaseOrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InvoiceStatus> for CoreInvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Sent => Self::Sent,
            InvoiceStatus::Unpaid => Self::Unpaid,
            InvoiceStatus::PartiallyPaid => Self::PartiallyPaid,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreInvoiceStatus> for InvoiceStatus {
    fn from(status: CoreInvoiceStatus) -> Self {
        match status {
            CoreInvoiceStatus::Draft => Self::Draft,
            CoreInvoiceStatus::Sent => Self::Sent,
            CoreInvoiceStatus::Unpaid => Self::Unpaid,
            CoreInvoiceStatus::PartiallyPaid => Self::PartiallyPaid,
            CoreInvoiceStatus::Paid => Self::Paid,
            CoreInvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CorePaymentStatus> for InvoiceStatus {
    fn from(status: CorePaymentStatus) -> Self {
        CoreInvoiceStatus::from(status).into()
    }
}

impl From<PaymentStatus> for CorePaymentStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unpaid => Self::Unpaid,
            PaymentStatus::PartiallyPaid => Self::PartiallyPaid,
            PaymentStatus::Paid => Self::Paid,
        }
    }
}

impl From<CorePaymentStatus> for PaymentStatus {
    fn from(status: CorePaymentStatus) -> Self {
        match status {
            CorePaymentStatus::Unpaid => Self::Unpaid,
            CorePaymentStatus::PartiallyPaid => Self::PartiallyPaid,
            CorePaymentStatus::Paid => Self::Paid,
        }
    }
}

impl From<CreditNoteStatus> for CoreCreditNoteStatus {
    fn from(status: CreditNoteStatus) -> Self {
        match status {
            CreditNoteStatus::Pending => Self::Pending,
            CreditNoteStatus::Adjusted => Self::Adjusted,
            CreditNoteStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreCreditNoteStatus> for CreditNoteStatus {
    fn from(status: CoreCreditNoteStatus) -> Self {
        match status {
            CoreCreditNoteStatus::Pending => Self::Pending,
            CoreCreditNoteStatus::Adjusted => Self::Adjusted,
            CoreCreditNoteStatus::Cancelled => Self::Cancelled,
        }
    }
}
