use actix_web::{HttpRequest, http::header, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::composer;
use crate::db::{components as components_db, projects as projects_db};
use crate::error::ApiError;
use crate::models::Archived;
use crate::models::portfolio_view::ViewContext;
use crate::resolver::{self, Visibility};
use crate::response::{ApiResult, ok};

fn header_value(req: &HttpRequest, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// GET /api/v1/public/portfolio/{code}: the shareable portfolio.
pub async fn get_portfolio(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> ApiResult {
    let context = ViewContext {
        user_agent: header_value(&req, header::USER_AGENT),
        referer: header_value(&req, header::REFERER),
    };
    ok(composer::public_portfolio(db.get_ref(), &path.into_inner(), context).await?)
}

/// GET /api/v1/public/project: active projects.
pub async fn list_projects(db: web::Data<DatabaseConnection>) -> ApiResult {
    let rows = projects_db::list_projects(db.get_ref(), Archived::Exclude).await?;
    ok(resolver::resolve_projects(db.get_ref(), rows, Visibility::Public).await?)
}

/// GET /api/v1/public/project/{project_id}
pub async fn get_project(db: web::Data<DatabaseConnection>, path: web::Path<Uuid>) -> ApiResult {
    let project = projects_db::get_project(db.get_ref(), path.into_inner(), Archived::Exclude)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let mut resolved =
        resolver::resolve_projects(db.get_ref(), vec![project], Visibility::Public).await?;
    ok(resolved.pop())
}

/// GET /api/v1/public/project/{project_id}/component: active components of an active project.
pub async fn list_project_components(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult {
    let project_id = path.into_inner();
    projects_db::get_project(db.get_ref(), project_id, Archived::Exclude)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let rows = components_db::list_components(db.get_ref(), project_id, Archived::Exclude).await?;
    ok(resolver::resolve_components(db.get_ref(), rows, Visibility::Public).await?)
}
