use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `technologies` table and its columns.
#[derive(DeriveIden)]
enum Technologies {
    Table,
    Id,
    Name,
    CategoryId,
    Link,
    Icon,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // `category_id` is a plain reference column. Rows are only ever
        // archived, and a dangling reference resolves to null on read.
        manager
            .create_table(
                Table::create()
                    .table(Technologies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Technologies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Technologies::Name).string().not_null())
                    .col(ColumnDef::new(Technologies::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Technologies::Link).string().null())
                    .col(ColumnDef::new(Technologies::Icon).json_binary().null())
                    .col(
                        ColumnDef::new(Technologies::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Technologies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Technologies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Technologies::Table).to_owned())
            .await
    }
}
