use sea_orm::*;
use uuid::Uuid;

use super::categories::require_active_category;
use super::not_found;
use crate::models::technology::{self, TechnologyInput};
use crate::models::{Archived, Status};

/// Insert a new technology. Its category must exist and be active.
pub async fn insert_technology(
    db: &DatabaseConnection,
    input: TechnologyInput,
) -> Result<technology::Model, DbErr> {
    require_active_category(db, input.category_id).await?;

    let now = chrono::Utc::now();
    let new_technology = technology::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        category_id: Set(input.category_id),
        link: Set(input.link),
        icon: Set(input.icon),
        status: Set(Status::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_technology.insert(db).await
}

pub async fn get_technology(
    db: &DatabaseConnection,
    id: Uuid,
    archived: Archived,
) -> Result<Option<technology::Model>, DbErr> {
    technology::Entity::find_by_id(id)
        .filter(archived.condition(technology::Column::Status))
        .one(db)
        .await
}

pub async fn list_technologies(
    db: &DatabaseConnection,
    archived: Archived,
) -> Result<Vec<technology::Model>, DbErr> {
    technology::Entity::find()
        .filter(archived.condition(technology::Column::Status))
        .order_by_asc(technology::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch technologies by id regardless of status.
pub async fn find_technologies(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<Vec<technology::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    technology::Entity::find()
        .filter(technology::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await
}

/// Fail unless every id names an active technology.
pub async fn require_active_technologies(db: &DatabaseConnection, ids: &[Uuid]) -> Result<(), DbErr> {
    if ids.is_empty() {
        return Ok(());
    }
    let found = technology::Entity::find()
        .filter(technology::Column::Id.is_in(ids.iter().copied()))
        .filter(technology::Column::Status.eq(Status::Active))
        .all(db)
        .await?;

    match ids.iter().find(|id| !found.iter().any(|t| t.id == **id)) {
        Some(missing) => Err(DbErr::RecordNotFound(format!(
            "Technology {missing} not found"
        ))),
        None => Ok(()),
    }
}

pub async fn update_technology(
    db: &DatabaseConnection,
    id: Uuid,
    input: TechnologyInput,
) -> Result<technology::Model, DbErr> {
    let technology = get_technology(db, id, Archived::Exclude)
        .await?
        .ok_or_else(|| not_found("Technology"))?;
    if technology.category_id != input.category_id {
        require_active_category(db, input.category_id).await?;
    }

    let mut active: technology::ActiveModel = technology.into();
    active.name = Set(input.name);
    active.category_id = Set(input.category_id);
    active.link = Set(input.link);
    active.icon = Set(input.icon);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

pub async fn archive_technology(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<technology::Model, DbErr> {
    let technology = technology::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found("Technology"))?;
    if technology.status == Status::Archived {
        return Ok(technology);
    }

    let mut active: technology::ActiveModel = technology.into();
    active.status = Set(Status::Archived);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}
