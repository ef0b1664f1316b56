use actix_web::web;
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::db::clients as clients_db;
use crate::error::ApiError;
use crate::models::client::{ClientInput, ClientView};
use crate::models::{ListQuery, MutationResult};
use crate::response::{ApiResult, ok};

/// GET /api/v1/admin/client: list clients.
pub async fn list_clients(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let clients = clients_db::list_clients(db.get_ref(), query.archived()).await?;
    ok(clients.into_iter().map(ClientView::from).collect::<Vec<_>>())
}

/// GET /api/v1/admin/client/{id}
pub async fn get_client(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> ApiResult {
    let client = clients_db::get_client(db.get_ref(), path.into_inner(), query.archived())
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;
    ok(ClientView::from(client))
}

/// POST /api/v1/admin/client
pub async fn create_client(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<ClientInput>,
) -> ApiResult {
    let input = body.into_inner();
    input.validate()?;

    let client = clients_db::insert_client(db.get_ref(), input).await?;
    ok(MutationResult::added(client.id))
}

/// PUT /api/v1/admin/client/{id}
pub async fn update_client(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ClientInput>,
) -> ApiResult {
    let input = body.into_inner();
    input.validate()?;

    let client = clients_db::update_client(db.get_ref(), path.into_inner(), input).await?;
    ok(MutationResult::updated(client.id))
}

/// DELETE /api/v1/admin/client/{id}: archive, never delete.
pub async fn archive_client(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult {
    let client = clients_db::archive_client(db.get_ref(), path.into_inner()).await?;
    ok(MutationResult::archived(client.id))
}
