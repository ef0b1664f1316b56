use sea_orm::*;
use uuid::Uuid;

use super::not_found;
use crate::models::client::{self, ClientInput};
use crate::models::{Archived, Status};

/// Insert a new client.
pub async fn insert_client(db: &DatabaseConnection, input: ClientInput) -> Result<client::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_client = client::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        address: Set(input.address),
        status: Set(Status::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_client.insert(db).await
}

pub async fn get_client(
    db: &DatabaseConnection,
    id: Uuid,
    archived: Archived,
) -> Result<Option<client::Model>, DbErr> {
    client::Entity::find_by_id(id)
        .filter(archived.condition(client::Column::Status))
        .one(db)
        .await
}

pub async fn list_clients(db: &DatabaseConnection, archived: Archived) -> Result<Vec<client::Model>, DbErr> {
    client::Entity::find()
        .filter(archived.condition(client::Column::Status))
        .order_by_asc(client::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch clients by id regardless of status.
pub async fn find_clients(db: &DatabaseConnection, ids: &[Uuid]) -> Result<Vec<client::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    client::Entity::find()
        .filter(client::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await
}

/// Fail unless the client exists and is active.
pub async fn require_active_client(db: &DatabaseConnection, id: Uuid) -> Result<client::Model, DbErr> {
    get_client(db, id, Archived::Exclude)
        .await?
        .ok_or_else(|| not_found("Client"))
}

pub async fn update_client(
    db: &DatabaseConnection,
    id: Uuid,
    input: ClientInput,
) -> Result<client::Model, DbErr> {
    let client = require_active_client(db, id).await?;

    let mut active: client::ActiveModel = client.into();
    active.name = Set(input.name);
    active.address = Set(input.address);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Flip the client to archived. Archiving twice is a no-op.
pub async fn archive_client(db: &DatabaseConnection, id: Uuid) -> Result<client::Model, DbErr> {
    let client = client::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found("Client"))?;
    if client.status == Status::Archived {
        return Ok(client);
    }

    let mut active: client::ActiveModel = client.into();
    active.status = Set(Status::Archived);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}
