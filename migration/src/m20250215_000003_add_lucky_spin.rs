use sea_orm_migration::prelude::*;

/// Konfigurasi hadiah Lucky Spin per periode.
/// - kind: FIXED (potongan nominal), PERCENT (persen dari base), NONE (zonk)
/// - quota/used: jatah hadiah dan yang sudah diklaim, invariant 0 <= used <= quota
/// - weight: bobot relatif undian (default 1)
/// - branch_id NULL = berlaku untuk semua cabang
#[derive(DeriveIden)]
enum SpinPrizes {
    Table,
    Id,
    Period,
    BranchId,
    Label,
    Kind,
    Value,
    Quota,
    Used,
    Active,
    Weight,
    CreatedAt,
}

/// Audit trail spin: satu baris per klaim sukses, append-only.
#[derive(DeriveIden)]
enum SpinLogs {
    Table,
    Id,
    StudentId,
    InvoiceId,
    PrizeId,
    DiscountAmount,
    SpunAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Branches {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SpinPrizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SpinPrizes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SpinPrizes::Period).string_len(7).not_null())
                    .col(ColumnDef::new(SpinPrizes::BranchId).uuid().null())
                    .col(ColumnDef::new(SpinPrizes::Label).string_len(255).not_null())
                    .col(
                        ColumnDef::new(SpinPrizes::Kind)
                            .string_len(20)
                            .not_null()
                            .default("NONE"),
                    )
                    .col(
                        ColumnDef::new(SpinPrizes::Value)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SpinPrizes::Quota)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SpinPrizes::Used)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SpinPrizes::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SpinPrizes::Weight)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(SpinPrizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_spin_prizes_period")
                    .table(SpinPrizes::Table)
                    .col(SpinPrizes::Period)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(SpinPrizes::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_spin_prizes_branch")
                            .from_tbl(SpinPrizes::Table)
                            .from_col(SpinPrizes::BranchId)
                            .to_tbl(Branches::Table)
                            .to_col(Branches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SpinLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SpinLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SpinLogs::StudentId).uuid().not_null())
                    .col(ColumnDef::new(SpinLogs::InvoiceId).uuid().not_null())
                    .col(ColumnDef::new(SpinLogs::PrizeId).uuid().not_null())
                    .col(
                        ColumnDef::new(SpinLogs::DiscountAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SpinLogs::SpunAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpinLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_spin_logs_student")
                    .table(SpinLogs::Table)
                    .col(SpinLogs::StudentId)
                    .to_owned(),
            )
            .await?;

        // tanpa ON DELETE CASCADE, histori klaim harus tetap ada
        manager
            .alter_table(
                Table::alter()
                    .table(SpinLogs::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_spin_logs_student")
                            .from_tbl(SpinLogs::Table)
                            .from_col(SpinLogs::StudentId)
                            .to_tbl(Students::Table)
                            .to_col(Students::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(SpinLogs::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_spin_logs_invoice")
                            .from_tbl(SpinLogs::Table)
                            .from_col(SpinLogs::InvoiceId)
                            .to_tbl(Invoices::Table)
                            .to_col(Invoices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(SpinLogs::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_spin_logs_prize")
                            .from_tbl(SpinLogs::Table)
                            .from_col(SpinLogs::PrizeId)
                            .to_tbl(SpinPrizes::Table)
                            .to_col(SpinPrizes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(SpinLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(SpinPrizes::Table).to_owned())
            .await?;
        Ok(())
    }
}
