use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create identities table
        manager
            .create_table(
                Table::create()
                    .table(Identities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Identities::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Identities::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Identities::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Identities::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Identities::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Identities::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create directory_records table
        manager
            .create_table(
                Table::create()
                    .table(DirectoryRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DirectoryRecords::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(DirectoryRecords::Name).string().not_null())
                    .col(ColumnDef::new(DirectoryRecords::Email).string().not_null())
                    .col(ColumnDef::new(DirectoryRecords::IsDeleted).boolean().not_null().default(false))
                    .col(ColumnDef::new(DirectoryRecords::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(DirectoryRecords::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Email uniqueness only applies to rows that have not been soft
        // deleted, so the index must be partial. SchemaManager's index
        // builder cannot express the WHERE clause.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_directory_records_email_active \
                 ON directory_records (email) WHERE is_deleted = 0",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_directory_records_is_deleted")
                    .table(DirectoryRecords::Table)
                    .col(DirectoryRecords::IsDeleted)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DirectoryRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Identities::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Identities {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DirectoryRecords {
    Table,
    Id,
    Name,
    Email,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}
