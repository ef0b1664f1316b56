pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_clients_table;
mod m20250301_000002_create_categories_table;
mod m20250301_000003_create_technologies_table;
mod m20250301_000004_create_projects_table;
mod m20250301_000005_create_components_table;
mod m20250301_000006_create_portfolios_table;
mod m20250305_000001_create_portfolio_views_table;
mod m20250305_000002_add_reference_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_clients_table::Migration),
            Box::new(m20250301_000002_create_categories_table::Migration),
            Box::new(m20250301_000003_create_technologies_table::Migration),
            Box::new(m20250301_000004_create_projects_table::Migration),
            Box::new(m20250301_000005_create_components_table::Migration),
            Box::new(m20250301_000006_create_portfolios_table::Migration),
            Box::new(m20250305_000001_create_portfolio_views_table::Migration),
            Box::new(m20250305_000002_add_reference_indexes::Migration),
        ]
    }
}
