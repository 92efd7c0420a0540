//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for ShopOne:
//!
//! - `transactions`: daily sales and expenses
//! - `dues`: customer credit ("udhar") records
//! - `supplier_purchases`: stock purchases with partial-payment tracking

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Kind,
    AmountMinor,
    Title,
    Category,
    Quantity,
    PaymentMode,
    OccurredAt,
}

#[derive(Iden)]
enum Dues {
    Table,
    Id,
    CustomerName,
    AmountMinor,
    Description,
    Status,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SupplierPurchases {
    Table,
    Id,
    SupplierName,
    ProductName,
    Quantity,
    UnitBuyPriceMinor,
    TotalCostMinor,
    PaidAmountMinor,
    RemainingDueMinor,
    ExpectedUnitSellPriceMinor,
    PaymentStatus,
    PurchaseDate,
    DueDate,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Title).string())
                    .col(ColumnDef::new(Transactions::Category).string())
                    .col(
                        ColumnDef::new(Transactions::Quantity)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Transactions::PaymentMode).string())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-occurred_at-kind")
                    .table(Transactions::Table)
                    .col(Transactions::OccurredAt)
                    .col(Transactions::Kind)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Dues
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Dues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Dues::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Dues::CustomerName).string().not_null())
                    .col(ColumnDef::new(Dues::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Dues::Description).string())
                    .col(
                        ColumnDef::new(Dues::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Dues::DueDate).timestamp())
                    .col(ColumnDef::new(Dues::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Dues::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-dues-status")
                    .table(Dues::Table)
                    .col(Dues::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Supplier Purchases
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SupplierPurchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupplierPurchases::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::SupplierName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::ProductName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::Quantity)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::UnitBuyPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::TotalCostMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::PaidAmountMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::RemainingDueMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::ExpectedUnitSellPriceMinor)
                            .big_integer(),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::PaymentStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::PurchaseDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::DueDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierPurchases::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-supplier_purchases-payment_status-due_date")
                    .table(SupplierPurchases::Table)
                    .col(SupplierPurchases::PaymentStatus)
                    .col(SupplierPurchases::DueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SupplierPurchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Dues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        Ok(())
    }
}
