use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Branches {
    Table,
    Id,
    Code,
    Slug,
    Name,
    Address,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    Nis,
    Nama,
    Kelas,
    Phone,
    BranchId,
    CreatedAt,
}

/// Akun login (super admin / admin cabang / siswa).
/// Siswa terhubung ke baris `students` lewat student_id,
/// admin cabang ke baris `branches` lewat branch_id.
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    Name,
    StudentId,
    BranchId,
    IsActive,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Branches::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Branches::Code).string_len(64).not_null())
                    .col(ColumnDef::new(Branches::Slug).string_len(64).not_null())
                    .col(ColumnDef::new(Branches::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Branches::Address).text().null())
                    .col(
                        ColumnDef::new(Branches::CreatedAt)
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
                    .name("idx_branches_code_unique")
                    .table(Branches::Table)
                    .col(Branches::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::Nis).string_len(64).not_null())
                    .col(ColumnDef::new(Students::Nama).string_len(255).not_null())
                    .col(ColumnDef::new(Students::Kelas).string_len(64).not_null())
                    .col(ColumnDef::new(Students::Phone).string_len(32).null())
                    .col(ColumnDef::new(Students::BranchId).uuid().null())
                    .col(
                        ColumnDef::new(Students::CreatedAt)
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
                    .name("idx_students_nis_unique")
                    .table(Students::Table)
                    .col(Students::Nis)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Students::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_students_branch")
                            .from_tbl(Students::Table)
                            .from_col(Students::BranchId)
                            .to_tbl(Branches::Table)
                            .to_col(Branches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Users::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                    .col(ColumnDef::new(Users::Name).string_len(255).null())
                    .col(ColumnDef::new(Users::StudentId).uuid().null())
                    .col(ColumnDef::new(Users::BranchId).uuid().null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
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
                    .name("idx_users_username_unique")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_users_student")
                            .from_tbl(Users::Table)
                            .from_col(Users::StudentId)
                            .to_tbl(Students::Table)
                            .to_col(Students::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_users_branch")
                            .from_tbl(Users::Table)
                            .from_col(Users::BranchId)
                            .to_tbl(Branches::Table)
                            .to_col(Branches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Branches::Table).to_owned())
            .await?;
        Ok(())
    }
}
