use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Status;
use super::category::CategoryView;
use super::media::{ComponentLink, Gallery, ImageUpload, Links};
use super::project::ProjectView;
use super::technology::TechnologyView;

/// SeaORM entity for the `components` table.
///
/// Technology references live in `component_technologies` so that they can
/// be queried from either side.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "components")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub project_id: Uuid,
    pub category_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub links: Links,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub cover: Option<ImageUpload>,
    #[sea_orm(column_type = "JsonBinary")]
    pub gallery: Gallery,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::component_technology::Entity")]
    ComponentTechnologies,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
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
pub struct CreateComponent {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub technology_ids: Vec<Uuid>,
    #[serde(default)]
    pub links: Vec<ComponentLink>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateComponent {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub technology_ids: Option<Vec<Uuid>>,
    pub links: Option<Vec<ComponentLink>>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl UpdateComponent {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category_id.is_none()
            && self.technology_ids.is_none()
            && self.links.is_none()
            && self.summary.is_none()
            && self.description.is_none()
    }
}

/// Entry of the lightweight component picker.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentOption {
    pub id: Uuid,
    pub text: String,
}

impl From<Model> for ComponentOption {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            text: m.name,
        }
    }
}

/// A component with every reference denormalized. Dangling references are `null`.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentView {
    pub id: Uuid,
    pub name: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub links: Links,
    pub cover: Option<ImageUpload>,
    pub gallery: Gallery,
    pub project: Option<ProjectView>,
    pub category: Option<CategoryView>,
    pub technologies: Vec<Option<TechnologyView>>,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}
