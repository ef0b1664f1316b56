use sea_orm::*;
use uuid::Uuid;

use crate::models::portfolio_view::{self, ViewContext};

/// Record one public fetch of a portfolio.
pub async fn record_view(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
    context: ViewContext,
) -> Result<portfolio_view::Model, DbErr> {
    let view = portfolio_view::ActiveModel {
        id: Set(Uuid::new_v4()),
        portfolio_id: Set(portfolio_id),
        user_agent: Set(context.user_agent),
        referer: Set(context.referer),
        created_at: Set(chrono::Utc::now()),
    };

    view.insert(db).await
}
