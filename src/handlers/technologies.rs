use actix_web::web;
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::db::technologies as technologies_db;
use crate::error::ApiError;
use crate::models::technology::TechnologyInput;
use crate::models::{ListQuery, MutationResult};
use crate::resolver;
use crate::response::{ApiResult, ok};

/// GET /api/v1/admin/technology: list technologies with their category.
pub async fn list_technologies(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let rows = technologies_db::list_technologies(db.get_ref(), query.archived()).await?;
    ok(resolver::resolve_technologies(db.get_ref(), rows).await?)
}

/// GET /api/v1/admin/technology/{id}
pub async fn get_technology(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let technology =
        technologies_db::get_technology(db.get_ref(), path.into_inner(), query.archived())
            .await?
            .ok_or_else(|| ApiError::NotFound("Technology not found".to_string()))?;

    let mut resolved = resolver::resolve_technologies(db.get_ref(), vec![technology]).await?;
    ok(resolved.pop())
}

/// POST /api/v1/admin/technology
pub async fn create_technology(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<TechnologyInput>,
) -> ApiResult {
    let input = body.into_inner();
    input.validate()?;

    let technology = technologies_db::insert_technology(db.get_ref(), input).await?;
    ok(MutationResult::added(technology.id))
}

/// PUT /api/v1/admin/technology/{id}
pub async fn update_technology(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<TechnologyInput>,
) -> ApiResult {
    let input = body.into_inner();
    input.validate()?;

    let technology =
        technologies_db::update_technology(db.get_ref(), path.into_inner(), input).await?;
    ok(MutationResult::updated(technology.id))
}

/// DELETE /api/v1/admin/technology/{id}
pub async fn archive_technology(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult {
    let technology = technologies_db::archive_technology(db.get_ref(), path.into_inner()).await?;
    ok(MutationResult::archived(technology.id))
}
