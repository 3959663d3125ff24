use sea_orm_migration::prelude::*;

/// Periode SPP (satu baris per bulan "YYYY-MM", hanya satu yang aktif).
#[derive(DeriveIden)]
enum SppPeriods {
    Table,
    Id,
    Period,
    Amount,
    SpinDeadlineDay,
    Active,
    CreatedAt,
    UpdatedAt,
}

/// Tagihan SPP per (siswa, periode).
#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    StudentId,
    Period,
    BaseAmount,
    DiscountAmount,
    FinalAmount,
    Status,
    SpunAt,
    PaidAt,
    CreatedAt,
}

/// Pengajuan pembayaran (bukti transfer, menunggu review admin).
#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    InvoiceId,
    Method,
    Status,
    ProofUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Students {
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
                    .table(SppPeriods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SppPeriods::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SppPeriods::Period).string_len(7).not_null())
                    .col(
                        ColumnDef::new(SppPeriods::Amount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SppPeriods::SpinDeadlineDay)
                            .integer()
                            .not_null()
                            .default(11),
                    )
                    .col(
                        ColumnDef::new(SppPeriods::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SppPeriods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(SppPeriods::UpdatedAt)
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
                    .name("idx_spp_periods_period_unique")
                    .table(SppPeriods::Table)
                    .col(SppPeriods::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Invoices::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Invoices::Period).string_len(7).not_null())
                    .col(
                        ColumnDef::new(Invoices::BaseAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Invoices::DiscountAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Invoices::FinalAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Invoices::Status)
                            .string_len(20)
                            .not_null()
                            .default("UNPAID"),
                    )
                    .col(
                        ColumnDef::new(Invoices::SpunAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // satu invoice per (siswa, periode)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_invoices_student_period_unique")
                    .table(Invoices::Table)
                    .col(Invoices::StudentId)
                    .col(Invoices::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Invoices::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_invoices_student")
                            .from_tbl(Invoices::Table)
                            .from_col(Invoices::StudentId)
                            .to_tbl(Students::Table)
                            .to_col(Students::Id),
                    )
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
                    .col(
                        ColumnDef::new(Payments::Method)
                            .string_len(32)
                            .not_null()
                            .default("TRANSFER"),
                    )
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Payments::ProofUrl).text().null())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
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
                    .name("idx_payments_invoice")
                    .table(Payments::Table)
                    .col(Payments::InvoiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Payments::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_payments_invoice")
                            .from_tbl(Payments::Table)
                            .from_col(Payments::InvoiceId)
                            .to_tbl(Invoices::Table)
                            .to_col(Invoices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(SppPeriods::Table).to_owned())
            .await?;
        Ok(())
    }
}
