//! Initial database migration.
//!
//! Creates parties, purchase orders with line items, sales invoices with
//! lines and payments, purchase invoices with supplier payments, credit notes
//! with items, and the audit log. Built with the schema builder so the same
//! migration runs on Postgres and SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: PARTIES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Parties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Parties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Parties::Name).string().not_null())
                    .col(ColumnDef::new(Parties::Gstin).string_len(15).null())
                    .col(ColumnDef::new(Parties::Kind).string_len(16).not_null())
                    .col(money(Parties::ReceivableBalance))
                    .col(money(Parties::PayableBalance))
                    .col(timestamp(Parties::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: PURCHASE ORDERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PurchaseOrders::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(PurchaseOrders::PoNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::PartyId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrders::PoDate).date().not_null())
                    .col(ColumnDef::new(PurchaseOrders::DeliveryDate).date().null())
                    .col(ColumnDef::new(PurchaseOrders::Status).string_len(24).not_null())
                    .col(timestamp(PurchaseOrders::CreatedAt))
                    .col(timestamp(PurchaseOrders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_orders_party")
                            .from(PurchaseOrders::Table, PurchaseOrders::PartyId)
                            .to(Parties::Table, Parties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PoLineItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PoLineItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PoLineItems::PurchaseOrderId).uuid().not_null())
                    .col(ColumnDef::new(PoLineItems::PartNumber).string().not_null())
                    .col(ColumnDef::new(PoLineItems::Description).string().not_null())
                    .col(ColumnDef::new(PoLineItems::Unit).string_len(16).not_null())
                    .col(money(PoLineItems::Rate))
                    .col(quantity(PoLineItems::QtyOrdered))
                    .col(quantity(PoLineItems::QtyReceived))
                    .col(quantity(PoLineItems::QtyDispatched))
                    .col(timestamp(PoLineItems::CreatedAt))
                    .col(timestamp(PoLineItems::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_po_line_items_order")
                            .from(PoLineItems::Table, PoLineItems::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: SALES INVOICES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Invoices::InvoiceNumber).string().not_null())
                    .col(ColumnDef::new(Invoices::PartyId).uuid().not_null())
                    .col(ColumnDef::new(Invoices::PurchaseOrderId).uuid().not_null())
                    .col(ColumnDef::new(Invoices::InvoiceDate).date().not_null())
                    .col(money(Invoices::Subtotal))
                    .col(money(Invoices::Cgst))
                    .col(money(Invoices::Sgst))
                    .col(money(Invoices::Igst))
                    .col(money(Invoices::TotalAmount))
                    .col(money(Invoices::PaidAmount))
                    .col(money(Invoices::BalanceDue))
                    .col(ColumnDef::new(Invoices::Remarks).text().null())
                    .col(ColumnDef::new(Invoices::Status).string_len(16).not_null())
                    .col(timestamp(Invoices::CreatedAt))
                    .col(timestamp(Invoices::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_party")
                            .from(Invoices::Table, Invoices::PartyId)
                            .to(Parties::Table, Parties::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_order")
                            .from(Invoices::Table, Invoices::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Number allocation relies on this index to detect races.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_invoices_invoice_number")
                    .table(Invoices::Table)
                    .col(Invoices::InvoiceNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_invoices_party_date")
                    .table(Invoices::Table)
                    .col(Invoices::PartyId)
                    .col(Invoices::InvoiceDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvoiceLineItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(InvoiceLineItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(InvoiceLineItems::InvoiceId).uuid().not_null())
                    .col(ColumnDef::new(InvoiceLineItems::PoLineItemId).uuid().not_null())
                    .col(quantity(InvoiceLineItems::Qty))
                    .col(money(InvoiceLineItems::Rate))
                    .col(money(InvoiceLineItems::Amount))
                    .col(timestamp(InvoiceLineItems::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_line_items_invoice")
                            .from(InvoiceLineItems::Table, InvoiceLineItems::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_line_items_po_line")
                            .from(InvoiceLineItems::Table, InvoiceLineItems::PoLineItemId)
                            .to(PoLineItems::Table, PoLineItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_invoice_line_items_po_line")
                    .table(InvoiceLineItems::Table)
                    .col(InvoiceLineItems::PoLineItemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::InvoiceId).uuid().not_null())
                    .col(money(Payments::Amount))
                    .col(ColumnDef::new(Payments::PaymentDate).date().not_null())
                    .col(ColumnDef::new(Payments::Mode).string_len(32).null())
                    .col(ColumnDef::new(Payments::Reference).string().null())
                    .col(ColumnDef::new(Payments::Remarks).text().null())
                    .col(ColumnDef::new(Payments::Status).string_len(16).not_null())
                    .col(timestamp(Payments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_invoice")
                            .from(Payments::Table, Payments::InvoiceId)
                            .to(Invoices::Table, Invoices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_invoice")
                    .table(Payments::Table)
                    .col(Payments::InvoiceId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: PURCHASE INVOICES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(PurchaseInvoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PurchaseInvoices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PurchaseInvoices::PartyId).uuid().not_null())
                    .col(
                        ColumnDef::new(PurchaseInvoices::SupplierInvoiceNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseInvoices::InvoiceDate).date().not_null())
                    .col(money(PurchaseInvoices::TotalAmount))
                    .col(money(PurchaseInvoices::PaidAmount))
                    .col(money(PurchaseInvoices::BalanceDue))
                    .col(
                        ColumnDef::new(PurchaseInvoices::PaymentStatus)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseInvoices::Remarks).text().null())
                    .col(timestamp(PurchaseInvoices::CreatedAt))
                    .col(timestamp(PurchaseInvoices::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_invoices_party")
                            .from(PurchaseInvoices::Table, PurchaseInvoices::PartyId)
                            .to(Parties::Table, Parties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_purchase_invoices_supplier_number")
                    .table(PurchaseInvoices::Table)
                    .col(PurchaseInvoices::PartyId)
                    .col(PurchaseInvoices::SupplierInvoiceNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchasePayments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PurchasePayments::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(PurchasePayments::PurchaseInvoiceId)
                            .uuid()
                            .not_null(),
                    )
                    .col(money(PurchasePayments::Amount))
                    .col(ColumnDef::new(PurchasePayments::PaymentDate).date().not_null())
                    .col(ColumnDef::new(PurchasePayments::Mode).string_len(32).null())
                    .col(ColumnDef::new(PurchasePayments::Reference).string().null())
                    .col(ColumnDef::new(PurchasePayments::Remarks).text().null())
                    .col(timestamp(PurchasePayments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_payments_invoice")
                            .from(PurchasePayments::Table, PurchasePayments::PurchaseInvoiceId)
                            .to(PurchaseInvoices::Table, PurchaseInvoices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 5: CREDIT NOTES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(CreditNotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CreditNotes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CreditNotes::CreditNoteNumber).string().not_null())
                    .col(ColumnDef::new(CreditNotes::PartyId).uuid().not_null())
                    .col(ColumnDef::new(CreditNotes::CreditNoteDate).date().not_null())
                    .col(money(CreditNotes::TotalAmount))
                    .col(ColumnDef::new(CreditNotes::Reason).text().null())
                    .col(ColumnDef::new(CreditNotes::Status).string_len(16).not_null())
                    .col(ColumnDef::new(CreditNotes::AdjustedInvoiceId).uuid().null())
                    .col(
                        ColumnDef::new(CreditNotes::AppliedAmount)
                            .decimal_len(16, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CreditNotes::AdjustedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp(CreditNotes::CreatedAt))
                    .col(timestamp(CreditNotes::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_notes_party")
                            .from(CreditNotes::Table, CreditNotes::PartyId)
                            .to(Parties::Table, Parties::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_notes_invoice")
                            .from(CreditNotes::Table, CreditNotes::AdjustedInvoiceId)
                            .to(Invoices::Table, Invoices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_credit_notes_number")
                    .table(CreditNotes::Table)
                    .col(CreditNotes::CreditNoteNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditNoteItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CreditNoteItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CreditNoteItems::CreditNoteId).uuid().not_null())
                    .col(ColumnDef::new(CreditNoteItems::Description).string().not_null())
                    .col(quantity(CreditNoteItems::Qty))
                    .col(money(CreditNoteItems::Rate))
                    .col(money(CreditNoteItems::Amount))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_note_items_note")
                            .from(CreditNoteItems::Table, CreditNoteItems::CreditNoteId)
                            .to(CreditNotes::Table, CreditNotes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 6: AUDIT LOG
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AuditLogs::Entity).string_len(32).not_null())
                    .col(ColumnDef::new(AuditLogs::EntityId).uuid().null())
                    .col(ColumnDef::new(AuditLogs::Action).string_len(32).not_null())
                    .col(ColumnDef::new(AuditLogs::Details).json().not_null())
                    .col(timestamp(AuditLogs::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_entity")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::Entity)
                    .col(AuditLogs::EntityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditNoteItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditNotes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchasePayments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseInvoices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvoiceLineItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PoLineItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parties::Table).if_exists().to_owned())
            .await
    }
}

/// Money column: `DECIMAL(16, 2) NOT NULL DEFAULT 0`.
fn money<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .decimal_len(16, 2)
        .not_null()
        .default(0)
        .to_owned()
}

/// Quantity column: `DECIMAL(16, 3) NOT NULL DEFAULT 0`.
fn quantity<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .decimal_len(16, 3)
        .not_null()
        .default(0)
        .to_owned()
}

fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[derive(DeriveIden)]
enum Parties {
    Table,
    Id,
    Name,
    Gstin,
    Kind,
    ReceivableBalance,
    PayableBalance,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PurchaseOrders {
    Table,
    Id,
    PoNumber,
    PartyId,
    PoDate,
    DeliveryDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PoLineItems {
    Table,
    Id,
    PurchaseOrderId,
    PartNumber,
    Description,
    Unit,
    Rate,
    QtyOrdered,
    QtyReceived,
    QtyDispatched,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    InvoiceNumber,
    PartyId,
    PurchaseOrderId,
    InvoiceDate,
    Subtotal,
    Cgst,
    Sgst,
    Igst,
    TotalAmount,
    PaidAmount,
    BalanceDue,
    Remarks,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InvoiceLineItems {
    Table,
    Id,
    InvoiceId,
    PoLineItemId,
    Qty,
    Rate,
    Amount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    InvoiceId,
    Amount,
    PaymentDate,
    Mode,
    Reference,
    Remarks,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PurchaseInvoices {
    Table,
    Id,
    PartyId,
    SupplierInvoiceNumber,
    InvoiceDate,
    TotalAmount,
    PaidAmount,
    BalanceDue,
    PaymentStatus,
    Remarks,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PurchasePayments {
    Table,
    Id,
    PurchaseInvoiceId,
    Amount,
    PaymentDate,
    Mode,
    Reference,
    Remarks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CreditNotes {
    Table,
    Id,
    CreditNoteNumber,
    PartyId,
    CreditNoteDate,
    TotalAmount,
    Reason,
    Status,
    AdjustedInvoiceId,
    AppliedAmount,
    AdjustedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CreditNoteItems {
    Table,
    Id,
    CreditNoteId,
    Description,
    Qty,
    Rate,
    Amount,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    Entity,
    EntityId,
    Action,
    Details,
    CreatedAt,
}
