use actix_web::web;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::composer;
use crate::db::portfolios as portfolios_db;
use crate::error::ApiError;
use crate::models::MutationResult;
use crate::models::portfolio::{DetailQuery, PortfolioInput};
use crate::response::{ApiResult, ok};

/// GET /api/v1/admin/portfolio?detailed=: list portfolios.
pub async fn list_portfolios(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<DetailQuery>,
) -> ApiResult {
    let rows = portfolios_db::list_portfolios(db.get_ref(), query.archived()).await?;
    if query.is_detailed() {
        ok(composer::details(db.get_ref(), rows).await?)
    } else {
        ok(composer::summaries(db.get_ref(), rows).await?)
    }
}

/// GET /api/v1/admin/portfolio/{id}?detailed=
pub async fn get_portfolio(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<DetailQuery>,
) -> ApiResult {
    let portfolio = portfolios_db::get_portfolio(db.get_ref(), path.into_inner(), query.archived())
        .await?
        .ok_or_else(|| ApiError::NotFound("Portfolio not found".to_string()))?;

    if query.is_detailed() {
        ok(composer::details(db.get_ref(), vec![portfolio]).await?.pop())
    } else {
        ok(composer::summaries(db.get_ref(), vec![portfolio]).await?.pop())
    }
}

/// POST /api/v1/admin/portfolio
pub async fn create_portfolio(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<PortfolioInput>,
) -> ApiResult {
    let portfolio = composer::create_portfolio(db.get_ref(), body.into_inner()).await?;
    ok(MutationResult::added(portfolio.id))
}

/// PUT /api/v1/admin/portfolio/{id}
pub async fn update_portfolio(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<PortfolioInput>,
) -> ApiResult {
    let portfolio =
        composer::update_portfolio(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    ok(MutationResult::updated(portfolio.id))
}

/// DELETE /api/v1/admin/portfolio/{id}
pub async fn archive_portfolio(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult {
    let portfolio = portfolios_db::archive_portfolio(db.get_ref(), path.into_inner()).await?;
    ok(MutationResult::archived(portfolio.id))
}
