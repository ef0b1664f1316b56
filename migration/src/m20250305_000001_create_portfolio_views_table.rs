use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum PortfolioViews {
    Table,
    Id,
    PortfolioId,
    UserAgent,
    Referer,
    CreatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortfolioViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortfolioViews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PortfolioViews::PortfolioId).uuid().not_null())
                    .col(ColumnDef::new(PortfolioViews::UserAgent).text().null())
                    .col(ColumnDef::new(PortfolioViews::Referer).text().null())
                    .col(
                        ColumnDef::new(PortfolioViews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_views_portfolio_id")
                            .from(PortfolioViews::Table, PortfolioViews::PortfolioId)
                            .to(Portfolios::Table, Portfolios::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortfolioViews::Table).to_owned())
            .await
    }
}
