pub mod category;
pub mod client;
pub mod component;
pub mod component_technology;
pub mod media;
pub mod portfolio;
pub mod portfolio_view;
pub mod project;
pub mod technology;

use sea_orm::entity::prelude::*;
use sea_orm::Condition;
use serde::{Deserialize, Serialize};

/// Lifecycle of every stored entity. Rows are never deleted; archiving is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "archived")]
    Archived,
}

/// Whether a read path should also return archived rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Archived {
    #[default]
    Exclude,
    Include,
}

impl Archived {
    /// Condition on a `status` column matching this flag.
    pub fn condition<C: ColumnTrait>(self, status: C) -> Condition {
        match self {
            Archived::Exclude => Condition::all().add(status.eq(Status::Active)),
            Archived::Include => Condition::all(),
        }
    }
}

/// Query parameters shared by list and get endpoints: `?include_archived=true`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub include_archived: Option<bool>,
}

impl ListQuery {
    pub fn archived(&self) -> Archived {
        if self.include_archived.unwrap_or(false) {
            Archived::Include
        } else {
            Archived::Exclude
        }
    }
}

/// Body returned by create/update/archive endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResult {
    pub id: Uuid,
    pub message: &'static str,
}

impl MutationResult {
    pub fn added(id: Uuid) -> Self {
        Self {
            id,
            message: "Successfully Added",
        }
    }

    pub fn updated(id: Uuid) -> Self {
        Self {
            id,
            message: "Successfully Updated",
        }
    }

    pub fn archived(id: Uuid) -> Self {
        Self {
            id,
            message: "Successfully Archived",
        }
    }
}

/// Body returned by image upload endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub link: String,
    pub message: &'static str,
}

impl UploadResult {
    pub fn uploaded(link: String) -> Self {
        Self {
            link,
            message: "Successfully Uploaded",
        }
    }
}

/// A reference rendered as `{id, name}` in lightweight listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_maps_to_archived_flag() {
        let query = ListQuery {
            include_archived: Some(true),
        };
        assert_eq!(query.archived(), Archived::Include);
        assert_eq!(ListQuery::default().archived(), Archived::Exclude);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Status::Archived).unwrap(),
            serde_json::json!("archived")
        );
    }
}
