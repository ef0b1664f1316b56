pub mod categories;
pub mod clients;
pub mod components;
pub mod portfolios;
pub mod projects;
pub mod technologies;
pub mod views;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

/// Connect to PostgreSQL and bring the schema up to date.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub(crate) fn not_found(entity: &str) -> DbErr {
    DbErr::RecordNotFound(format!("{entity} not found"))
}
