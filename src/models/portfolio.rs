use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::component::ComponentView;
use super::{NamedRef, Status};

/// SeaORM entity for the `portfolios` table.
///
/// `component_ids` is the snapshot taken when the portfolio was last saved;
/// `filters` keeps the payload that produced it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub component_ids: ComponentIds,
    #[sea_orm(column_type = "JsonBinary")]
    pub filters: ComponentFilter,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::portfolio_view::Entity")]
    Views,
}

impl Related<super::portfolio_view::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Views.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Ordered component ids of a portfolio snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ComponentIds(pub Vec<Uuid>);

/// Criteria for picking components. Every list is optional in requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(default)]
pub struct ComponentFilter {
    pub component_ids: Vec<Uuid>,
    pub project_ids: Vec<Uuid>,
    pub technology_ids: Vec<Uuid>,
    pub category_ids: Vec<Uuid>,
}

impl ComponentFilter {
    pub fn is_empty(&self) -> bool {
        self.component_ids.is_empty()
            && self.project_ids.is_empty()
            && self.technology_ids.is_empty()
            && self.category_ids.is_empty()
    }
}

// ── DTOs ──

/// Body of portfolio create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PortfolioInput {
    #[validate(custom(function = "not_blank", message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub filters: ComponentFilter,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Validated portfolio content, ready to be written.
#[derive(Debug, Clone)]
pub struct PortfolioDraft {
    pub title: String,
    pub description: Option<String>,
    pub component_ids: Vec<Uuid>,
    pub filters: ComponentFilter,
}

/// `?detailed=true` selects the edit shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailQuery {
    pub detailed: Option<bool>,
    pub include_archived: Option<bool>,
}

impl DetailQuery {
    pub fn is_detailed(&self) -> bool {
        self.detailed.unwrap_or(false)
    }

    pub fn archived(&self) -> super::Archived {
        super::ListQuery {
            include_archived: self.include_archived,
        }
        .archived()
    }
}

/// Filter ids rendered as `{id, name}`; `null` where the id no longer resolves.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NamedFilters {
    pub components: Vec<Option<NamedRef>>,
    pub projects: Vec<Option<NamedRef>>,
    pub technologies: Vec<Option<NamedRef>>,
    pub categories: Vec<Option<NamedRef>>,
}

/// Listing shape of a portfolio.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub filters: NamedFilters,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Edit shape of a portfolio: raw filters plus the resolved snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioDetail {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub filters: ComponentFilter,
    pub components: Vec<Option<ComponentView>>,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicPortfolio {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub components: Vec<Option<ComponentView>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_lists_default_to_empty() {
        let input: PortfolioInput =
            serde_json::from_str(r#"{"title":"Mobile work"}"#).unwrap();
        assert!(input.filters.is_empty());

        let id = Uuid::new_v4();
        let input: PortfolioInput = serde_json::from_value(serde_json::json!({
            "title": "Mobile work",
            "project_ids": [id]
        }))
        .unwrap();
        assert!(!input.filters.is_empty());
        assert_eq!(input.filters.project_ids, vec![id]);
    }

    #[test]
    fn blank_title_fails_validation() {
        let input = PortfolioInput {
            title: "   ".to_string(),
            description: None,
            filters: ComponentFilter::default(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }
}
