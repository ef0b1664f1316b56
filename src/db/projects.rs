use sea_orm::*;
use uuid::Uuid;

use super::clients::require_active_client;
use super::not_found;
use crate::models::media::{GalleryItem, ImageUpload};
use crate::models::project::{self, NewProject, ProjectChanges, ProjectImage};
use crate::models::{Archived, Status};

/// Insert a new project. Its client must exist and be active.
pub async fn insert_project(db: &DatabaseConnection, input: NewProject) -> Result<project::Model, DbErr> {
    require_active_client(db, input.client_id).await?;

    let now = chrono::Utc::now();
    let new_project = project::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        client_id: Set(input.client_id),
        cover: Set(None),
        logo: Set(None),
        gallery: Set(Default::default()),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        cost: Set(input.cost),
        currency: Set(input.currency),
        status: Set(Status::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_project.insert(db).await
}

pub async fn get_project(
    db: &DatabaseConnection,
    id: Uuid,
    archived: Archived,
) -> Result<Option<project::Model>, DbErr> {
    project::Entity::find_by_id(id)
        .filter(archived.condition(project::Column::Status))
        .one(db)
        .await
}

pub async fn list_projects(db: &DatabaseConnection, archived: Archived) -> Result<Vec<project::Model>, DbErr> {
    project::Entity::find()
        .filter(archived.condition(project::Column::Status))
        .order_by_asc(project::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch projects by id regardless of status.
pub async fn find_projects(db: &DatabaseConnection, ids: &[Uuid]) -> Result<Vec<project::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    project::Entity::find()
        .filter(project::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await
}

pub async fn require_active_project(db: &DatabaseConnection, id: Uuid) -> Result<project::Model, DbErr> {
    get_project(db, id, Archived::Exclude)
        .await?
        .ok_or_else(|| not_found("Project"))
}

pub async fn update_project(
    db: &DatabaseConnection,
    id: Uuid,
    changes: ProjectChanges,
) -> Result<project::Model, DbErr> {
    let project = require_active_project(db, id).await?;

    let mut active: project::ActiveModel = project.into();

    if let Some(client_id) = changes.client_id {
        require_active_client(db, client_id).await?;
        active.client_id = Set(client_id);
    }
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(start_date) = changes.start_date {
        active.start_date = Set(Some(start_date));
    }
    if let Some(end_date) = changes.end_date {
        active.end_date = Set(Some(end_date));
    }
    if let Some(cost) = changes.cost {
        active.cost = Set(Some(cost));
    }
    if let Some(currency) = changes.currency {
        active.currency = Set(Some(currency));
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

pub async fn archive_project(db: &DatabaseConnection, id: Uuid) -> Result<project::Model, DbErr> {
    let project = project::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found("Project"))?;
    if project.status == Status::Archived {
        return Ok(project);
    }

    let mut active: project::ActiveModel = project.into();
    active.status = Set(Status::Archived);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Set or clear the cover or logo, returning the image it replaced.
pub async fn replace_project_image(
    db: &DatabaseConnection,
    id: Uuid,
    slot: ProjectImage,
    image: Option<ImageUpload>,
) -> Result<Option<ImageUpload>, DbErr> {
    let project = require_active_project(db, id).await?;
    let previous = match slot {
        ProjectImage::Cover => project.cover.clone(),
        ProjectImage::Logo => project.logo.clone(),
    };

    let mut active: project::ActiveModel = project.into();
    match slot {
        ProjectImage::Cover => active.cover = Set(image),
        ProjectImage::Logo => active.logo = Set(image),
    }
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;

    Ok(previous)
}

pub async fn add_project_gallery_item(
    db: &DatabaseConnection,
    id: Uuid,
    item: GalleryItem,
) -> Result<project::Model, DbErr> {
    let project = require_active_project(db, id).await?;

    let mut gallery = project.gallery.clone();
    gallery.push(item);

    let mut active: project::ActiveModel = project.into();
    active.gallery = Set(gallery);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Remove a gallery item, returning it so its stored object can be deleted.
pub async fn remove_project_gallery_item(
    db: &DatabaseConnection,
    id: Uuid,
    item_id: Uuid,
) -> Result<GalleryItem, DbErr> {
    let project = require_active_project(db, id).await?;

    let mut gallery = project.gallery.clone();
    let removed = gallery
        .remove(item_id)
        .ok_or_else(|| not_found("Gallery item"))?;

    let mut active: project::ActiveModel = project.into();
    active.gallery = Set(gallery);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;

    Ok(removed)
}
