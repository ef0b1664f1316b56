use sea_orm::*;
use uuid::Uuid;

use super::not_found;
use crate::models::category::{self, CategoryInput};
use crate::models::{Archived, Status};

/// Insert a new category.
pub async fn insert_category(
    db: &DatabaseConnection,
    input: CategoryInput,
) -> Result<category::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_category = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        icon: Set(input.icon),
        status: Set(Status::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_category.insert(db).await
}

pub async fn get_category(
    db: &DatabaseConnection,
    id: Uuid,
    archived: Archived,
) -> Result<Option<category::Model>, DbErr> {
    category::Entity::find_by_id(id)
        .filter(archived.condition(category::Column::Status))
        .one(db)
        .await
}

pub async fn list_categories(
    db: &DatabaseConnection,
    archived: Archived,
) -> Result<Vec<category::Model>, DbErr> {
    category::Entity::find()
        .filter(archived.condition(category::Column::Status))
        .order_by_asc(category::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch categories by id regardless of status.
pub async fn find_categories(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<Vec<category::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    category::Entity::find()
        .filter(category::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await
}

pub async fn require_active_category(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<category::Model, DbErr> {
    get_category(db, id, Archived::Exclude)
        .await?
        .ok_or_else(|| not_found("Category"))
}

pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    input: CategoryInput,
) -> Result<category::Model, DbErr> {
    let category = require_active_category(db, id).await?;

    let mut active: category::ActiveModel = category.into();
    active.name = Set(input.name);
    active.icon = Set(input.icon);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

pub async fn archive_category(db: &DatabaseConnection, id: Uuid) -> Result<category::Model, DbErr> {
    let category = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found("Category"))?;
    if category.status == Status::Archived {
        return Ok(category);
    }

    let mut active: category::ActiveModel = category.into();
    active.status = Set(Status::Archived);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}
