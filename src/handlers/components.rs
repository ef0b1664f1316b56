use actix_web::{HttpRequest, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::aggregator;
use crate::auth::middleware::AdminUser;
use crate::config::AppConfig;
use crate::db::components as components_db;
use crate::error::ApiError;
use crate::models::component::{ComponentOption, CreateComponent, UpdateComponent};
use crate::models::media::{GalleryItem, ImageSlot};
use crate::models::portfolio::ComponentFilter;
use crate::models::{ListQuery, MutationResult, UploadResult};
use crate::resolver::{self, Visibility};
use crate::response::{ApiResult, ok};
use crate::storage::LocalStorage;
use crate::upload;

/// GET /api/v1/admin/project/{project_id}/component: list a project's components, resolved.
pub async fn list_components(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let rows = components_db::list_components(db.get_ref(), path.into_inner(), query.archived()).await?;
    ok(resolver::resolve_components(db.get_ref(), rows, Visibility::Admin).await?)
}

/// GET /api/v1/admin/project/{project_id}/component/{id}
pub async fn get_component(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let (project_id, id) = path.into_inner();
    let component = components_db::get_component(db.get_ref(), project_id, id, query.archived())
        .await?
        .ok_or_else(|| ApiError::NotFound("Component not found".to_string()))?;

    let mut resolved =
        resolver::resolve_components(db.get_ref(), vec![component], Visibility::Admin).await?;
    ok(resolved.pop())
}

/// POST /api/v1/admin/project/{project_id}/component
pub async fn create_component(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateComponent>,
) -> ApiResult {
    let input = body.into_inner();
    input.validate()?;

    let component = components_db::insert_component(db.get_ref(), path.into_inner(), input).await?;
    ok(MutationResult::added(component.id))
}

/// PUT /api/v1/admin/project/{project_id}/component/{id}: at least one field is required.
pub async fn update_component(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateComponent>,
) -> ApiResult {
    let (project_id, id) = path.into_inner();
    let input = body.into_inner();
    if input.is_empty() {
        return Err(ApiError::BadRequest(
            "No attributes specified for updation".to_string(),
        ));
    }
    input.validate()?;

    let component = components_db::update_component(db.get_ref(), project_id, id, input).await?;
    ok(MutationResult::updated(component.id))
}

/// DELETE /api/v1/admin/project/{project_id}/component/{id}
pub async fn archive_component(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult {
    let (project_id, id) = path.into_inner();
    let component = components_db::archive_component(db.get_ref(), project_id, id).await?;
    ok(MutationResult::archived(component.id))
}

/// POST /api/v1/admin/project/{project_id}/component/{id}/cover: multipart field `cover`.
pub async fn upload_cover(
    _admin: AdminUser,
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    config: web::Data<AppConfig>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Bytes,
) -> ApiResult {
    let (project_id, id) = path.into_inner();
    let form = upload::parse_image_form(&req, body, ImageSlot::Cover).await?;
    upload::validate_image(&form.file, config.upload_max_bytes)?;

    let image = storage.store(&form.file).await?;
    let previous =
        match components_db::replace_component_cover(db.get_ref(), project_id, id, Some(image.clone())).await {
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

/// DELETE /api/v1/admin/project/{project_id}/component/{id}/cover
pub async fn delete_cover(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult {
    let (project_id, id) = path.into_inner();
    let previous = components_db::replace_component_cover(db.get_ref(), project_id, id, None).await?;
    storage
        .discard(previous.as_ref().and_then(|p| p.meta.as_ref()))
        .await;
    ok(MutationResult::updated(id))
}

/// POST /api/v1/admin/project/{project_id}/component/{id}/gallery
pub async fn add_gallery_item(
    _admin: AdminUser,
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    config: web::Data<AppConfig>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Bytes,
) -> ApiResult {
    let (project_id, id) = path.into_inner();
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

    if let Err(e) = components_db::add_component_gallery_item(db.get_ref(), project_id, id, item).await {
        storage.discard(image.meta.as_ref()).await;
        return Err(e.into());
    }
    ok(UploadResult::uploaded(image.link))
}

/// DELETE /api/v1/admin/project/{project_id}/component/{id}/gallery/{item_id}
pub async fn delete_gallery_item(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<LocalStorage>,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult {
    let (project_id, id, item_id) = path.into_inner();

    let removed =
        components_db::remove_component_gallery_item(db.get_ref(), project_id, id, item_id).await?;
    storage.discard(removed.meta.as_ref()).await;
    ok(MutationResult::updated(id))
}

/// GET /api/v1/admin/component/select: `{id, text}` of every active component.
pub async fn select_components(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult {
    let rows = components_db::list_active_components(db.get_ref()).await?;
    ok(rows
        .into_iter()
        .map(ComponentOption::from)
        .collect::<Vec<_>>())
}

/// POST /api/v1/admin/component/filter: preview the components a portfolio filter selects.
pub async fn filter_components(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<ComponentFilter>,
) -> ApiResult {
    let filter = body.into_inner();
    ok(aggregator::filter_components(db.get_ref(), &filter, Visibility::Admin).await?)
}
