use actix_web::{HttpRequest, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::config::AppConfig;
use crate::db::projects as projects_db;
use crate::error::ApiError;
use crate::models::media::{GalleryItem, ImageSlot};
use crate::models::project::{CreateProject, ProjectImage, UpdateProject};
use crate::models::{ListQuery, MutationResult, UploadResult};
use crate::resolver::{self, Visibility};
use crate::response::{ApiResult, ok};
use crate::storage::LocalStorage;
use crate::upload;

/// GET /api/v1/admin/project: list projects with their client.
pub async fn list_projects(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let rows = projects_db::list_projects(db.get_ref(), query.archived()).await?;
    ok(resolver::resolve_projects(db.get_ref(), rows, Visibility::Admin).await?)
}

/// GET /api/v1/admin/project/{id}
pub async fn get_project(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let project = projects_db::get_project(db.get_ref(), path.into_inner(), query.archived())
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let mut resolved =
        resolver::resolve_projects(db.get_ref(), vec![project], Visibility::Admin).await?;
    ok(resolved.pop())
}

/// POST /api/v1/admin/project
pub async fn create_project(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateProject>,
) -> ApiResult {
    let input = body.into_inner();
    input.validate()?;

    let project = projects_db::insert_project(db.get_ref(), input.parse()?).await?;
    ok(MutationResult::added(project.id))
}

/// PUT /api/v1/admin/project/{id}: at least one field is required.
pub async fn update_project(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProject>,
) -> ApiResult {
    let input = body.into_inner();
    if input.is_empty() {
        return Err(ApiError::BadRequest(
            "No attributes specified for updation".to_string(),
        ));
    }
    input.validate()?;

    let project = projects_db::update_project(db.get_ref(), path.into_inner(), input.parse()?).await?;
    ok(MutationResult::updated(project.id))
}

/// DELETE /api/v1/admin/project/{id}
pub async fn archive_project(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult {
    let project = projects_db::archive_project(db.get_ref(), path.into_inner()).await?;
    ok(MutationResult::archived(project.id))
}

async fn upload_image(
    req: HttpRequest,
    db: &DatabaseConnection,
    storage: &LocalStorage,
    config: &AppConfig,
    id: Uuid,
    body: web::Bytes,
    slot: ProjectImage,
) -> ApiResult {
    let form = upload::parse_image_form(&req, body, slot.into()).await?;
    upload::validate_image(&form.file, config.upload_max_bytes)?;

    let image = storage.store(&form.file).await?;
    let previous = match projects_db::replace_project_image(db, id, slot, Some(image.clone())).await {
        Ok(previous) => previous,
        Err(e) => {
            storage.discard(image.meta.as_ref()).await;
            return Err(e.into());
        }
    };
    storage
        .discard(previous.as_ref().and_then(|p| p.meta.as_ref()))
        .await;

    ok(UploadResult::uploaded(image.link))
}

async fn remove_image(
    db: &DatabaseConnection,
    storage: &LocalStorage,
    id: Uuid,
    slot: ProjectImage,
) -> ApiResult {
    let previous = projects_db::replace_project_image(db, id, slot, None).await?;
    storage
        .discard(previous.as_ref().and_then(|p| p.meta.as_ref()))
        .await;
    ok(MutationResult::updated(id))
}

/// POST /api/v1/admin/project/{id}/cover: multipart field `cover`.
pub async fn upload_cover(
    _admin: AdminUser,
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> ApiResult {
    upload_image(req, db.get_ref(), storage.get_ref(), config.get_ref(), path.into_inner(), body, ProjectImage::Cover).await
}

/// DELETE /api/v1/admin/project/{id}/cover
pub async fn delete_cover(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    path: web::Path<Uuid>,
) -> ApiResult {
    remove_image(db.get_ref(), storage.get_ref(), path.into_inner(), ProjectImage::Cover).await
}

/// POST /api/v1/admin/project/{id}/logo: multipart field `logo`.
pub async fn upload_logo(
    _admin: AdminUser,
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> ApiResult {
    upload_image(req, db.get_ref(), storage.get_ref(), config.get_ref(), path.into_inner(), body, ProjectImage::Logo).await
}

/// DELETE /api/v1/admin/project/{id}/logo
pub async fn delete_logo(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    path: web::Path<Uuid>,
) -> ApiResult {
    remove_image(db.get_ref(), storage.get_ref(), path.into_inner(), ProjectImage::Logo).await
}

/// POST /api/v1/admin/project/{id}/gallery: multipart field `gallery`, optional `name` and `description`.
pub async fn add_gallery_item(
    _admin: AdminUser,
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> ApiResult {
    let form = upload::parse_image_form(&req, body, ImageSlot::Gallery).await?;
    upload::validate_image(&form.file, config.upload_max_bytes)?;

    let image = storage.store(&form.file).await?;
    let item = GalleryItem {
        id: Uuid::new_v4(),
        name: form.name,
        description: form.description,
        link: image.link.clone(),
        meta: image.meta.clone(),
    };

    if let Err(e) = projects_db::add_project_gallery_item(db.get_ref(), path.into_inner(), item).await {
        storage.discard(image.meta.as_ref()).await;
        return Err(e.into());
    }
    ok(UploadResult::uploaded(image.link))
}

/// DELETE /api/v1/admin/project/{id}/gallery/{item_id}
pub async fn delete_gallery_item(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult {
    let (id, item_id) = path.into_inner();

    let removed = projects_db::remove_project_gallery_item(db.get_ref(), id, item_id).await?;
    storage.discard(removed.meta.as_ref()).await;
    ok(MutationResult::updated(id))
}
