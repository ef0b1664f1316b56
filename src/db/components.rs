use std::collections::HashMap;

use sea_orm::sea_query::Query;
use sea_orm::*;
use uuid::Uuid;

use super::categories::require_active_category;
use super::not_found;
use super::projects::require_active_project;
use super::technologies::require_active_technologies;
use crate::models::component::{self, CreateComponent, UpdateComponent};
use crate::models::component_technology;
use crate::models::media::{GalleryItem, ImageUpload, Links};
use crate::models::{Archived, Status};
use crate::resolver::unique_ids;

/// Insert a component under `project_id`. The project, its category and every
/// referenced technology must exist and be active.
pub async fn insert_component(
    db: &DatabaseConnection,
    project_id: Uuid,
    input: CreateComponent,
) -> Result<component::Model, DbErr> {
    require_active_project(db, project_id).await?;
    require_active_category(db, input.category_id).await?;
    require_active_technologies(db, &input.technology_ids).await?;

    let now = chrono::Utc::now();
    let new_component = component::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        project_id: Set(project_id),
        category_id: Set(input.category_id),
        links: Set(Links(input.links)),
        summary: Set(input.summary),
        description: Set(input.description),
        cover: Set(None),
        gallery: Set(Default::default()),
        status: Set(Status::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let component = new_component.insert(db).await?;
    insert_technology_links(db, component.id, &input.technology_ids).await?;

    Ok(component)
}

async fn insert_technology_links(
    db: &DatabaseConnection,
    component_id: Uuid,
    technology_ids: &[Uuid],
) -> Result<(), DbErr> {
    let technology_ids = unique_ids(technology_ids.iter().copied());
    if technology_ids.is_empty() {
        return Ok(());
    }

    let links = technology_ids
        .into_iter()
        .enumerate()
        .map(|(position, technology_id)| component_technology::ActiveModel {
            component_id: Set(component_id),
            technology_id: Set(technology_id),
            position: Set(position as i32),
        });

    component_technology::Entity::insert_many(links)
        .exec(db)
        .await?;
    Ok(())
}

pub async fn get_component(
    db: &DatabaseConnection,
    project_id: Uuid,
    id: Uuid,
    archived: Archived,
) -> Result<Option<component::Model>, DbErr> {
    component::Entity::find_by_id(id)
        .filter(component::Column::ProjectId.eq(project_id))
        .filter(archived.condition(component::Column::Status))
        .one(db)
        .await
}

pub async fn list_components(
    db: &DatabaseConnection,
    project_id: Uuid,
    archived: Archived,
) -> Result<Vec<component::Model>, DbErr> {
    component::Entity::find()
        .filter(component::Column::ProjectId.eq(project_id))
        .filter(archived.condition(component::Column::Status))
        .order_by_asc(component::Column::CreatedAt)
        .all(db)
        .await
}

/// Every active component, by name, for pickers.
pub async fn list_active_components(db: &DatabaseConnection) -> Result<Vec<component::Model>, DbErr> {
    component::Entity::find()
        .filter(component::Column::Status.eq(Status::Active))
        .order_by_asc(component::Column::Name)
        .all(db)
        .await
}

/// Fetch components by id regardless of status.
pub async fn find_components(db: &DatabaseConnection, ids: &[Uuid]) -> Result<Vec<component::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    component::Entity::find()
        .filter(component::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await
}

/// Active components whose `column` is one of `ids`, oldest first.
pub async fn active_components_where(
    db: &DatabaseConnection,
    column: component::Column,
    ids: &[Uuid],
) -> Result<Vec<component::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    component::Entity::find()
        .filter(column.is_in(ids.iter().copied()))
        .filter(component::Column::Status.eq(Status::Active))
        .order_by_asc(component::Column::CreatedAt)
        .all(db)
        .await
}

/// Active components referencing any of `technology_ids`, oldest first.
pub async fn active_components_using(
    db: &DatabaseConnection,
    technology_ids: &[Uuid],
) -> Result<Vec<component::Model>, DbErr> {
    if technology_ids.is_empty() {
        return Ok(Vec::new());
    }
    let linked = Query::select()
        .column(component_technology::Column::ComponentId)
        .from(component_technology::Entity)
        .and_where(component_technology::Column::TechnologyId.is_in(technology_ids.iter().copied()))
        .to_owned();

    component::Entity::find()
        .filter(component::Column::Id.in_subquery(linked))
        .filter(component::Column::Status.eq(Status::Active))
        .order_by_asc(component::Column::CreatedAt)
        .all(db)
        .await
}

/// Ordered technology ids per component.
pub async fn technology_links(
    db: &DatabaseConnection,
    component_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr> {
    if component_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = component_technology::Entity::find()
        .filter(component_technology::Column::ComponentId.is_in(component_ids.iter().copied()))
        .order_by_asc(component_technology::Column::ComponentId)
        .order_by_asc(component_technology::Column::Position)
        .all(db)
        .await?;

    let mut links: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in rows {
        links.entry(row.component_id).or_default().push(row.technology_id);
    }
    Ok(links)
}

pub async fn require_active_component(
    db: &DatabaseConnection,
    project_id: Uuid,
    id: Uuid,
) -> Result<component::Model, DbErr> {
    get_component(db, project_id, id, Archived::Exclude)
        .await?
        .ok_or_else(|| not_found("Component"))
}

/// Apply the given fields. A new technology list replaces the old one.
pub async fn update_component(
    db: &DatabaseConnection,
    project_id: Uuid,
    id: Uuid,
    input: UpdateComponent,
) -> Result<component::Model, DbErr> {
    let component = require_active_component(db, project_id, id).await?;

    if let Some(category_id) = input.category_id {
        require_active_category(db, category_id).await?;
    }
    if let Some(technology_ids) = &input.technology_ids {
        require_active_technologies(db, technology_ids).await?;
    }

    let mut active: component::ActiveModel = component.into();
    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(category_id) = input.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(links) = input.links {
        active.links = Set(Links(links));
    }
    if let Some(summary) = input.summary {
        active.summary = Set(Some(summary));
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;

    if let Some(technology_ids) = input.technology_ids {
        component_technology::Entity::delete_many()
            .filter(component_technology::Column::ComponentId.eq(id))
            .exec(db)
            .await?;
        insert_technology_links(db, id, &technology_ids).await?;
    }

    Ok(updated)
}

pub async fn archive_component(
    db: &DatabaseConnection,
    project_id: Uuid,
    id: Uuid,
) -> Result<component::Model, DbErr> {
    let component = component::Entity::find_by_id(id)
        .filter(component::Column::ProjectId.eq(project_id))
        .one(db)
        .await?
        .ok_or_else(|| not_found("Component"))?;
    if component.status == Status::Archived {
        return Ok(component);
    }

    let mut active: component::ActiveModel = component.into();
    active.status = Set(Status::Archived);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Set or clear the cover, returning the image it replaced.
pub async fn replace_component_cover(
    db: &DatabaseConnection,
    project_id: Uuid,
    id: Uuid,
    image: Option<ImageUpload>,
) -> Result<Option<ImageUpload>, DbErr> {
    let component = require_active_component(db, project_id, id).await?;
    let previous = component.cover.clone();

    let mut active: component::ActiveModel = component.into();
    active.cover = Set(image);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;

    Ok(previous)
}

pub async fn add_component_gallery_item(
    db: &DatabaseConnection,
    project_id: Uuid,
    id: Uuid,
    item: GalleryItem,
) -> Result<component::Model, DbErr> {
    let component = require_active_component(db, project_id, id).await?;

    let mut gallery = component.gallery.clone();
    gallery.push(item);

    let mut active: component::ActiveModel = component.into();
    active.gallery = Set(gallery);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

pub async fn remove_component_gallery_item(
    db: &DatabaseConnection,
    project_id: Uuid,
    id: Uuid,
    item_id: Uuid,
) -> Result<GalleryItem, DbErr> {
    let component = require_active_component(db, project_id, id).await?;

    let mut gallery = component.gallery.clone();
    let removed = gallery
        .remove(item_id)
        .ok_or_else(|| not_found("Gallery item"))?;

    let mut active: component::ActiveModel = component.into();
    active.gallery = Set(gallery);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;

    Ok(removed)
}
