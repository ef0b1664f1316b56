use actix_web::web;
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::db::categories as categories_db;
use crate::error::ApiError;
use crate::models::category::{CategoryInput, CategoryView};
use crate::models::{ListQuery, MutationResult};
use crate::response::{ApiResult, ok};

/// GET /api/v1/admin/category: list categories.
pub async fn list_categories(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let categories = categories_db::list_categories(db.get_ref(), query.archived()).await?;
    ok(categories
        .into_iter()
        .map(CategoryView::from)
        .collect::<Vec<_>>())
}

/// GET /api/v1/admin/category/{id}
pub async fn get_category(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let category = categories_db::get_category(db.get_ref(), path.into_inner(), query.archived())
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
    ok(CategoryView::from(category))
}

/// POST /api/v1/admin/category
pub async fn create_category(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CategoryInput>,
) -> ApiResult {
    let input = body.into_inner();
    input.validate()?;

    let category = categories_db::insert_category(db.get_ref(), input).await?;
    ok(MutationResult::added(category.id))
}

/// PUT /api/v1/admin/category/{id}
pub async fn update_category(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CategoryInput>,
) -> ApiResult {
    let input = body.into_inner();
    input.validate()?;

    let category = categories_db::update_category(db.get_ref(), path.into_inner(), input).await?;
    ok(MutationResult::updated(category.id))
}

/// DELETE /api/v1/admin/category/{id}
pub async fn archive_category(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult {
    let category = categories_db::archive_category(db.get_ref(), path.into_inner()).await?;
    ok(MutationResult::archived(category.id))
}
