//! Portfolio assembly: validation, component snapshots and public codes.

use rand::Rng;
use rand::distr::Alphanumeric;
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;
use validator::Validate;

use crate::aggregator;
use crate::db::{portfolios, views};
use crate::error::ApiError;
use crate::models::Status;
use crate::models::portfolio::{
    self, PortfolioDetail, PortfolioDraft, PortfolioInput, PortfolioSummary, PublicPortfolio,
};
use crate::models::portfolio_view::ViewContext;
use crate::resolver::{self, Visibility};

pub const CODE_LENGTH: usize = 10;
const CODE_ATTEMPTS: usize = 5;

/// A random alphanumeric public code.
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Validate the payload and take the component snapshot it selects.
pub async fn compose(db: &DatabaseConnection, input: PortfolioInput) -> Result<PortfolioDraft, ApiError> {
    input.validate()?;
    if input.filters.is_empty() {
        return Err(ApiError::MissingParameters(
            "One of component_ids, project_ids, technology_ids or category_ids is required"
                .to_string(),
        ));
    }

    let components = aggregator::collect_components(db, &input.filters).await?;
    if components.is_empty() {
        return Err(ApiError::MissingParameters(
            "No active components match the given filters".to_string(),
        ));
    }

    Ok(PortfolioDraft {
        title: input.title.trim().to_string(),
        description: input.description,
        component_ids: components.into_iter().map(|c| c.id).collect(),
        filters: input.filters,
    })
}

async fn unique_code(db: &DatabaseConnection) -> Result<String, ApiError> {
    for _ in 0..CODE_ATTEMPTS {
        let code = generate_code();
        if !portfolios::code_exists(db, &code).await? {
            return Ok(code);
        }
        tracing::warn!(%code, "portfolio code collision, regenerating");
    }
    Err(ApiError::Internal(
        "Could not generate a unique portfolio code".to_string(),
    ))
}

pub async fn create_portfolio(
    db: &DatabaseConnection,
    input: PortfolioInput,
) -> Result<portfolio::Model, ApiError> {
    let draft = compose(db, input).await?;
    let code = unique_code(db).await?;
    let created = portfolios::insert_portfolio(db, code, draft).await?;
    tracing::info!(id = %created.id, code = %created.code, "portfolio created");
    Ok(created)
}

/// Replace title, description, snapshot and filters. The code never changes.
pub async fn update_portfolio(
    db: &DatabaseConnection,
    id: Uuid,
    input: PortfolioInput,
) -> Result<portfolio::Model, ApiError> {
    let draft = compose(db, input).await?;
    Ok(portfolios::update_portfolio(db, id, draft).await?)
}

pub async fn summaries(
    db: &DatabaseConnection,
    rows: Vec<portfolio::Model>,
) -> Result<Vec<PortfolioSummary>, DbErr> {
    let filters: Vec<_> = rows.iter().map(|p| &p.filters).collect();
    let names = resolver::load_names(db, &filters).await?;

    Ok(rows
        .into_iter()
        .map(|p| PortfolioSummary {
            filters: names.named(&p.filters),
            id: p.id,
            title: p.title,
            description: p.description,
            code: p.code,
            status: p.status,
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
        .collect())
}

pub async fn details(
    db: &DatabaseConnection,
    rows: Vec<portfolio::Model>,
) -> Result<Vec<PortfolioDetail>, DbErr> {
    let snapshots: Vec<&[Uuid]> = rows.iter().map(|p| p.component_ids.0.as_slice()).collect();
    let resolved = resolver::resolve_snapshots(db, &snapshots, Visibility::Admin).await?;

    Ok(rows
        .into_iter()
        .zip(resolved)
        .map(|(p, components)| PortfolioDetail {
            id: p.id,
            title: p.title,
            description: p.description,
            code: p.code,
            filters: p.filters,
            components,
            status: p.status,
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
        .collect())
}

/// The shareable rendering of an active portfolio. Each successful fetch is recorded.
pub async fn public_portfolio(
    db: &DatabaseConnection,
    code: &str,
    context: ViewContext,
) -> Result<PublicPortfolio, ApiError> {
    let portfolio = portfolios::find_by_code(db, code)
        .await?
        .filter(|p| p.status == Status::Active)
        .ok_or_else(|| ApiError::NotFound("Portfolio not found".to_string()))?;

    let components =
        resolver::resolve_snapshot(db, &portfolio.component_ids.0, Visibility::Public).await?;

    if let Err(e) = views::record_view(db, portfolio.id, context).await {
        tracing::warn!(portfolio = %portfolio.id, "failed to record portfolio view: {e}");
    }

    Ok(PublicPortfolio {
        title: portfolio.title,
        description: portfolio.description,
        code: portfolio.code,
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::portfolio::{ComponentFilter, ComponentIds};
    use crate::resolver::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn input(filters: ComponentFilter) -> PortfolioInput {
        PortfolioInput {
            title: "Selected work".to_string(),
            description: None,
            filters,
        }
    }

    fn stored(status: Status) -> portfolio::Model {
        portfolio::Model {
            id: Uuid::new_v4(),
            title: "Selected work".to_string(),
            description: None,
            code: "AbCdE12345".to_string(),
            component_ids: ComponentIds::default(),
            filters: ComponentFilter::default(),
            status,
            created_at: fixtures::at(0),
            updated_at: fixtures::at(0),
        }
    }

    #[test]
    fn codes_are_ten_alphanumerics() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(generate_code(), code);
    }

    #[tokio::test]
    async fn empty_filters_are_rejected_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = create_portfolio(&db, input(ComponentFilter::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::MissingParameters(_)));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn blank_title_is_a_validation_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut body = input(ComponentFilter {
            project_ids: vec![Uuid::new_v4()],
            ..Default::default()
        });
        body.title = " ".to_string();

        let err = compose(&db, body).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn snapshot_holds_the_project_components() {
        let project_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let a = fixtures::component("Landing", project_id, category_id, 1);
        let b = fixtures::component("Checkout", project_id, category_id, 2);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![a.clone(), b.clone()]])
            .into_connection();

        let filters = ComponentFilter {
            project_ids: vec![project_id],
            ..Default::default()
        };
        let draft = compose(&db, input(filters.clone())).await.unwrap();

        assert_eq!(draft.component_ids, vec![a.id, b.id]);
        assert_eq!(draft.filters, filters);
    }

    #[tokio::test]
    async fn no_matching_components_is_missing_parameters() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::models::component::Model>::new()])
            .into_connection();

        let err = compose(
            &db,
            input(ComponentFilter {
                category_ids: vec![Uuid::new_v4()],
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::MissingParameters(_)));
    }

    #[tokio::test]
    async fn archived_portfolio_is_not_public() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored(Status::Archived)]])
            .into_connection();

        let err = public_portfolio(&db, "AbCdE12345", ViewContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<portfolio::Model>::new()])
            .into_connection();

        let err = public_portfolio(&db, "nope", ViewContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
