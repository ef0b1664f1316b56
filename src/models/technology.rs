use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Status;
use super::category::CategoryView;
use super::media::Icon;

/// SeaORM entity for the `technologies` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "technologies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub link: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub icon: Option<Icon>,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::component_technology::Entity")]
    ComponentTechnologies,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::component_technology::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComponentTechnologies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TechnologyInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub category_id: Uuid,
    #[validate(url(message = "link must be a valid url"))]
    pub link: Option<String>,
    pub icon: Option<Icon>,
}

/// A technology with its category reference denormalized.
#[derive(Debug, Clone, Serialize)]
pub struct TechnologyView {
    pub id: Uuid,
    pub name: String,
    pub link: Option<String>,
    pub icon: Option<Icon>,
    pub category: Option<CategoryView>,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl TechnologyView {
    pub fn new(m: Model, category: Option<CategoryView>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            link: m.link,
            icon: m.icon,
            category,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
