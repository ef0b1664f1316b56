use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `components` table and its columns.
#[derive(DeriveIden)]
enum Components {
    Table,
    Id,
    Name,
    ProjectId,
    CategoryId,
    Links,
    Summary,
    Description,
    Cover,
    Gallery,
    Status,
    CreatedAt,
    UpdatedAt,
}

/// Ordered technology references of a component.
#[derive(DeriveIden)]
enum ComponentTechnologies {
    Table,
    ComponentId,
    TechnologyId,
    Position,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Components::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Components::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Components::Name).string().not_null())
                    .col(ColumnDef::new(Components::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Components::CategoryId).uuid().not_null())
                    .col(
                        ColumnDef::new(Components::Links)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Components::Summary).text().null())
                    .col(ColumnDef::new(Components::Description).text().null())
                    .col(ColumnDef::new(Components::Cover).json_binary().null())
                    .col(
                        ColumnDef::new(Components::Gallery)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Components::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Components::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Components::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ComponentTechnologies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComponentTechnologies::ComponentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ComponentTechnologies::TechnologyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ComponentTechnologies::Position)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ComponentTechnologies::ComponentId)
                            .col(ComponentTechnologies::TechnologyId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_component_technologies_component_id")
                            .from(
                                ComponentTechnologies::Table,
                                ComponentTechnologies::ComponentId,
                            )
                            .to(Components::Table, Components::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ComponentTechnologies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Components::Table).to_owned())
            .await
    }
}
