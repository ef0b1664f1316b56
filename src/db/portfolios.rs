use sea_orm::*;
use uuid::Uuid;

use super::not_found;
use crate::models::portfolio::{self, ComponentIds, PortfolioDraft};
use crate::models::{Archived, Status};

/// Insert a new portfolio with an already generated public `code`.
pub async fn insert_portfolio(
    db: &DatabaseConnection,
    code: String,
    draft: PortfolioDraft,
) -> Result<portfolio::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_portfolio = portfolio::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(draft.title),
        description: Set(draft.description),
        code: Set(code),
        component_ids: Set(ComponentIds(draft.component_ids)),
        filters: Set(draft.filters),
        status: Set(Status::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_portfolio.insert(db).await
}

pub async fn code_exists(db: &DatabaseConnection, code: &str) -> Result<bool, DbErr> {
    let count = portfolio::Entity::find()
        .filter(portfolio::Column::Code.eq(code))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn get_portfolio(
    db: &DatabaseConnection,
    id: Uuid,
    archived: Archived,
) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio::Entity::find_by_id(id)
        .filter(archived.condition(portfolio::Column::Status))
        .one(db)
        .await
}

pub async fn list_portfolios(
    db: &DatabaseConnection,
    archived: Archived,
) -> Result<Vec<portfolio::Model>, DbErr> {
    portfolio::Entity::find()
        .filter(archived.condition(portfolio::Column::Status))
        .order_by_asc(portfolio::Column::CreatedAt)
        .all(db)
        .await
}

/// Look up a portfolio by public code, whatever its status.
pub async fn find_by_code(db: &DatabaseConnection, code: &str) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio::Entity::find()
        .filter(portfolio::Column::Code.eq(code))
        .one(db)
        .await
}

/// Replace everything but the code.
pub async fn update_portfolio(
    db: &DatabaseConnection,
    id: Uuid,
    draft: PortfolioDraft,
) -> Result<portfolio::Model, DbErr> {
    let portfolio = get_portfolio(db, id, Archived::Exclude)
        .await?
        .ok_or_else(|| not_found("Portfolio"))?;

    let mut active: portfolio::ActiveModel = portfolio.into();
    active.title = Set(draft.title);
    active.description = Set(draft.description);
    active.component_ids = Set(ComponentIds(draft.component_ids));
    active.filters = Set(draft.filters);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

pub async fn archive_portfolio(db: &DatabaseConnection, id: Uuid) -> Result<portfolio::Model, DbErr> {
    let portfolio = portfolio::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found("Portfolio"))?;
    if portfolio.status == Status::Archived {
        return Ok(portfolio);
    }

    let mut active: portfolio::ActiveModel = portfolio.into();
    active.status = Set(Status::Archived);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}
