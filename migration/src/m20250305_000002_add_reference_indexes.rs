use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Components {
    Table,
    ProjectId,
    CategoryId,
    Status,
}

#[derive(DeriveIden)]
enum ComponentTechnologies {
    Table,
    TechnologyId,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    ClientId,
}

#[derive(DeriveIden)]
enum PortfolioViews {
    Table,
    PortfolioId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Aggregation by project
        manager
            .create_index(
                Index::create()
                    .name("idx_components_project_id_status")
                    .table(Components::Table)
                    .col(Components::ProjectId)
                    .col(Components::Status)
                    .to_owned(),
            )
            .await?;

        // Aggregation by category
        manager
            .create_index(
                Index::create()
                    .name("idx_components_category_id_status")
                    .table(Components::Table)
                    .col(Components::CategoryId)
                    .col(Components::Status)
                    .to_owned(),
            )
            .await?;

        // Aggregation by technology goes through the link table
        manager
            .create_index(
                Index::create()
                    .name("idx_component_technologies_technology_id")
                    .table(ComponentTechnologies::Table)
                    .col(ComponentTechnologies::TechnologyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_client_id")
                    .table(Projects::Table)
                    .col(Projects::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_views_portfolio_id")
                    .table(PortfolioViews::Table)
                    .col(PortfolioViews::PortfolioId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_components_project_id_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_components_category_id_status").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_component_technologies_technology_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_projects_client_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_portfolio_views_portfolio_id").to_owned())
            .await?;

        Ok(())
    }
}
