//! Multi-criteria component selection.
//!
//! Each non-empty id list of a [`ComponentFilter`] selects the active
//! components matching it. The four queries run concurrently and their
//! results are merged in criterion order (components, projects,
//! technologies, categories), keeping the first occurrence of each component.

use std::collections::HashSet;

use futures_util::future::try_join4;
use sea_orm::{DatabaseConnection, DbErr};

use crate::db::components;
use crate::models::component::{self, ComponentView};
use crate::models::portfolio::ComponentFilter;
use crate::resolver::{self, Visibility};

/// Matching active components, deduplicated, without resolving references.
pub async fn collect_components(
    db: &DatabaseConnection,
    filter: &ComponentFilter,
) -> Result<Vec<component::Model>, DbErr> {
    if filter.is_empty() {
        return Ok(Vec::new());
    }

    let (by_id, by_project, by_technology, by_category) = try_join4(
        components::active_components_where(db, component::Column::Id, &filter.component_ids),
        components::active_components_where(db, component::Column::ProjectId, &filter.project_ids),
        components::active_components_using(db, &filter.technology_ids),
        components::active_components_where(db, component::Column::CategoryId, &filter.category_ids),
    )
    .await?;

    Ok(merge([by_id, by_project, by_technology, by_category]))
}

/// Matching active components with their references resolved.
pub async fn filter_components(
    db: &DatabaseConnection,
    filter: &ComponentFilter,
    visibility: Visibility,
) -> Result<Vec<ComponentView>, DbErr> {
    let rows = collect_components(db, filter).await?;
    resolver::resolve_components(db, rows, visibility).await
}

/// Concatenate the per-criterion results, first occurrence wins.
pub fn merge<const N: usize>(groups: [Vec<component::Model>; N]) -> Vec<component::Model> {
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .flatten()
        .filter(|component| seen.insert(component.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    #[test]
    fn overlapping_criteria_yield_each_component_once() {
        let project_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let a = fixtures::component("A", project_id, category_id, 1);
        let b = fixtures::component("B", project_id, category_id, 2);
        let c = fixtures::component("C", Uuid::new_v4(), category_id, 3);

        let merged = merge([
            vec![b.clone()],
            vec![a.clone(), b.clone()],
            vec![],
            vec![a.clone(), b.clone(), c.clone()],
        ]);

        let ids: Vec<Uuid> = merged.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![b.id, a.id, c.id]);
    }

    #[tokio::test]
    async fn empty_filter_issues_no_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let rows = collect_components(&db, &ComponentFilter::default())
            .await
            .unwrap();

        assert!(rows.is_empty());
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn single_criterion_queries_once() {
        let project_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let a = fixtures::component("A", project_id, category_id, 1);
        let b = fixtures::component("B", project_id, category_id, 2);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![a.clone(), b.clone()]])
            .into_connection();

        let filter = ComponentFilter {
            project_ids: vec![project_id],
            ..Default::default()
        };
        let rows = collect_components(&db, &filter).await.unwrap();

        assert_eq!(rows.iter().map(|m| m.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert_eq!(db.into_transaction_log().len(), 1);
    }
}
