//! Denormalizes stored id references into inline view objects.
//!
//! Loading is batched: every id a batch refers to is collected first and each
//! table is queried once, independent tables concurrently. The resulting
//! [`Lookup`] is then walked without touching the store. Missing targets
//! become `None` at their position; archived targets still resolve.

use std::collections::{HashMap, HashSet};

use futures_util::future::try_join;
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::db::{categories, clients, components, projects, technologies};
use crate::models::NamedRef;
use crate::models::category::{self, CategoryView};
use crate::models::client::{self, ClientView};
use crate::models::component::{self, ComponentView};
use crate::models::portfolio::{ComponentFilter, NamedFilters};
use crate::models::project::{self, ProjectView};
use crate::models::technology::{self, TechnologyView};

/// Who the resolved objects are for. Public readers never see storage metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Admin,
    Public,
}

/// Referenced rows of a batch, indexed by id.
#[derive(Debug, Default)]
pub struct Lookup {
    clients: HashMap<Uuid, client::Model>,
    categories: HashMap<Uuid, category::Model>,
    technologies: HashMap<Uuid, technology::Model>,
    projects: HashMap<Uuid, project::Model>,
    technology_links: HashMap<Uuid, Vec<Uuid>>,
}

impl Lookup {
    pub fn with_clients(mut self, rows: Vec<client::Model>) -> Self {
        self.clients.extend(rows.into_iter().map(|m| (m.id, m)));
        self
    }

    pub fn with_categories(mut self, rows: Vec<category::Model>) -> Self {
        self.categories.extend(rows.into_iter().map(|m| (m.id, m)));
        self
    }

    pub fn with_technologies(mut self, rows: Vec<technology::Model>) -> Self {
        self.technologies.extend(rows.into_iter().map(|m| (m.id, m)));
        self
    }

    pub fn with_projects(mut self, rows: Vec<project::Model>) -> Self {
        self.projects.extend(rows.into_iter().map(|m| (m.id, m)));
        self
    }

    pub fn with_technology_links(mut self, links: HashMap<Uuid, Vec<Uuid>>) -> Self {
        self.technology_links.extend(links);
        self
    }

    pub fn client(&self, id: Uuid) -> Option<ClientView> {
        self.clients.get(&id).cloned().map(ClientView::from)
    }

    pub fn category(&self, id: Uuid) -> Option<CategoryView> {
        self.categories.get(&id).cloned().map(CategoryView::from)
    }

    pub fn technology(&self, id: Uuid) -> Option<TechnologyView> {
        let m = self.technologies.get(&id)?.clone();
        let category = self.category(m.category_id);
        Some(TechnologyView::new(m, category))
    }

    pub fn project(&self, id: Uuid, visibility: Visibility) -> Option<ProjectView> {
        let m = self.projects.get(&id)?.clone();
        Some(self.project_view(m, visibility))
    }

    pub fn project_view(&self, m: project::Model, visibility: Visibility) -> ProjectView {
        let client = self.client(m.client_id);
        let mut view = ProjectView::new(m, client);
        if visibility == Visibility::Public {
            view.cover = view.cover.map(|c| c.public());
            view.logo = view.logo.map(|l| l.public());
            view.gallery = view.gallery.public();
        }
        view
    }

    pub fn component(&self, m: component::Model, visibility: Visibility) -> ComponentView {
        let technologies = self
            .technology_links
            .get(&m.id)
            .map(|ids| ids.iter().map(|id| self.technology(*id)).collect())
            .unwrap_or_default();

        let (cover, gallery) = match visibility {
            Visibility::Admin => (m.cover, m.gallery),
            Visibility::Public => (m.cover.map(|c| c.public()), m.gallery.public()),
        };

        ComponentView {
            id: m.id,
            name: m.name,
            summary: m.summary,
            description: m.description,
            links: m.links,
            cover,
            gallery,
            project: self.project(m.project_id, visibility),
            category: self.category(m.category_id),
            technologies,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn named<T>(map: &HashMap<Uuid, T>, ids: &[Uuid], name: impl Fn(&T) -> &str) -> Vec<Option<NamedRef>> {
        ids.iter()
            .map(|id| {
                map.get(id).map(|row| NamedRef {
                    id: *id,
                    name: name(row).to_string(),
                })
            })
            .collect()
    }
}

/// Names for the ids of a set of portfolio filters.
#[derive(Debug, Default)]
pub struct NameLookup {
    lookup: Lookup,
    components: HashMap<Uuid, component::Model>,
}

impl NameLookup {
    pub fn new(lookup: Lookup, components: Vec<component::Model>) -> Self {
        Self {
            lookup,
            components: components.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    pub fn named(&self, filter: &ComponentFilter) -> NamedFilters {
        NamedFilters {
            components: Lookup::named(&self.components, &filter.component_ids, |m| &m.name),
            projects: Lookup::named(&self.lookup.projects, &filter.project_ids, |m| &m.name),
            technologies: Lookup::named(&self.lookup.technologies, &filter.technology_ids, |m| {
                &m.name
            }),
            categories: Lookup::named(&self.lookup.categories, &filter.category_ids, |m| &m.name),
        }
    }
}

/// Ids in first-seen order without repeats.
pub fn unique_ids(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Load everything the given components refer to, nested references included.
pub async fn load_for_components(
    db: &DatabaseConnection,
    rows: &[component::Model],
) -> Result<Lookup, DbErr> {
    let component_ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
    let project_ids = unique_ids(rows.iter().map(|c| c.project_id));

    let (links, project_rows) = try_join(
        components::technology_links(db, &component_ids),
        projects::find_projects(db, &project_ids),
    )
    .await?;

    let technology_ids = unique_ids(links.values().flatten().copied());
    let client_ids = unique_ids(project_rows.iter().map(|p| p.client_id));

    let (technology_rows, client_rows) = try_join(
        technologies::find_technologies(db, &technology_ids),
        clients::find_clients(db, &client_ids),
    )
    .await?;

    let category_ids = unique_ids(
        rows.iter()
            .map(|c| c.category_id)
            .chain(technology_rows.iter().map(|t| t.category_id)),
    );
    let category_rows = categories::find_categories(db, &category_ids).await?;

    Ok(Lookup::default()
        .with_technology_links(links)
        .with_projects(project_rows)
        .with_technologies(technology_rows)
        .with_clients(client_rows)
        .with_categories(category_rows))
}

pub async fn resolve_components(
    db: &DatabaseConnection,
    rows: Vec<component::Model>,
    visibility: Visibility,
) -> Result<Vec<ComponentView>, DbErr> {
    let lookup = load_for_components(db, &rows).await?;
    Ok(rows
        .into_iter()
        .map(|m| lookup.component(m, visibility))
        .collect())
}

/// Resolve a stored id list in order; ids that no longer exist give `None`.
pub async fn resolve_snapshot(
    db: &DatabaseConnection,
    ids: &[Uuid],
    visibility: Visibility,
) -> Result<Vec<Option<ComponentView>>, DbErr> {
    let mut resolved = resolve_snapshots(db, &[ids], visibility).await?;
    Ok(resolved.pop().unwrap_or_default())
}

/// [`resolve_snapshot`] for several lists at once, sharing one set of queries.
pub async fn resolve_snapshots(
    db: &DatabaseConnection,
    snapshots: &[&[Uuid]],
    visibility: Visibility,
) -> Result<Vec<Vec<Option<ComponentView>>>, DbErr> {
    let all_ids = unique_ids(snapshots.iter().flat_map(|ids| ids.iter().copied()));
    let rows = components::find_components(db, &all_ids).await?;
    let lookup = load_for_components(db, &rows).await?;
    let by_id: HashMap<Uuid, component::Model> = rows.into_iter().map(|m| (m.id, m)).collect();

    Ok(snapshots
        .iter()
        .map(|ids| {
            ids.iter()
                .map(|id| {
                    by_id
                        .get(id)
                        .cloned()
                        .map(|m| lookup.component(m, visibility))
                })
                .collect()
        })
        .collect())
}

pub async fn resolve_projects(
    db: &DatabaseConnection,
    rows: Vec<project::Model>,
    visibility: Visibility,
) -> Result<Vec<ProjectView>, DbErr> {
    let client_ids = unique_ids(rows.iter().map(|p| p.client_id));
    let lookup = Lookup::default().with_clients(clients::find_clients(db, &client_ids).await?);
    Ok(rows
        .into_iter()
        .map(|m| lookup.project_view(m, visibility))
        .collect())
}

pub async fn resolve_technologies(
    db: &DatabaseConnection,
    rows: Vec<technology::Model>,
) -> Result<Vec<TechnologyView>, DbErr> {
    let category_ids = unique_ids(rows.iter().map(|t| t.category_id));
    let lookup =
        Lookup::default().with_categories(categories::find_categories(db, &category_ids).await?);
    Ok(rows
        .into_iter()
        .map(|m| {
            let category = lookup.category(m.category_id);
            TechnologyView::new(m, category)
        })
        .collect())
}

/// Load the names behind every id of the given filters.
pub async fn load_names(
    db: &DatabaseConnection,
    filters: &[&ComponentFilter],
) -> Result<NameLookup, DbErr> {
    let component_ids = unique_ids(filters.iter().flat_map(|f| f.component_ids.iter().copied()));
    let project_ids = unique_ids(filters.iter().flat_map(|f| f.project_ids.iter().copied()));
    let technology_ids = unique_ids(filters.iter().flat_map(|f| f.technology_ids.iter().copied()));
    let category_ids = unique_ids(filters.iter().flat_map(|f| f.category_ids.iter().copied()));

    let ((component_rows, project_rows), (technology_rows, category_rows)) = try_join(
        try_join(
            components::find_components(db, &component_ids),
            projects::find_projects(db, &project_ids),
        ),
        try_join(
            technologies::find_technologies(db, &technology_ids),
            categories::find_categories(db, &category_ids),
        ),
    )
    .await?;

    let lookup = Lookup::default()
        .with_projects(project_rows)
        .with_technologies(technology_rows)
        .with_categories(category_rows);
    Ok(NameLookup::new(lookup, component_rows))
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::Status;

    #[test]
    fn resolves_nested_references() {
        let acme = client("Acme");
        let web = category("Web");
        let rust = technology("Rust", web.id);
        let site = project("Storefront", acme.id);
        let checkout = component("Checkout", site.id, web.id, 1);

        let lookup = Lookup::default()
            .with_clients(vec![acme.clone()])
            .with_categories(vec![web.clone()])
            .with_technologies(vec![rust.clone()])
            .with_projects(vec![site.clone()])
            .with_technology_links(HashMap::from([(checkout.id, vec![rust.id])]));

        let view = lookup.component(checkout, Visibility::Admin);
        let project = view.project.unwrap();
        assert_eq!(project.id, site.id);
        assert_eq!(project.client.unwrap().name, "Acme");
        assert_eq!(view.category.unwrap().id, web.id);
        let technology = view.technologies[0].clone().unwrap();
        assert_eq!(technology.name, "Rust");
        assert_eq!(technology.category.unwrap().name, "Web");
        assert!(project.cover.unwrap().meta.is_some());
    }

    #[test]
    fn dangling_references_become_none_at_their_position() {
        let web = category("Web");
        let rust = technology("Rust", Uuid::new_v4());
        let missing_technology = Uuid::new_v4();
        let site = project("Storefront", Uuid::new_v4());
        let checkout = component("Checkout", site.id, Uuid::new_v4(), 1);

        let lookup = Lookup::default()
            .with_categories(vec![web])
            .with_technologies(vec![rust.clone()])
            .with_projects(vec![site])
            .with_technology_links(HashMap::from([(
                checkout.id,
                vec![missing_technology, rust.id],
            )]));

        let view = lookup.component(checkout, Visibility::Admin);
        assert!(view.category.is_none());
        assert!(view.project.unwrap().client.is_none());
        assert!(view.technologies[0].is_none());
        let rust_view = view.technologies[1].clone().unwrap();
        assert!(rust_view.category.is_none());
    }

    #[test]
    fn archived_targets_still_resolve() {
        let mut acme = client("Acme");
        acme.status = Status::Archived;
        let lookup = Lookup::default().with_clients(vec![acme.clone()]);

        assert_eq!(lookup.client(acme.id).unwrap().status, Status::Archived);
    }

    #[test]
    fn public_visibility_strips_metadata_at_every_depth() {
        let acme = client("Acme");
        let web = category("Web");
        let site = project("Storefront", acme.id);
        let checkout = component("Checkout", site.id, web.id, 1);

        let lookup = Lookup::default()
            .with_clients(vec![acme])
            .with_categories(vec![web])
            .with_projects(vec![site]);

        let view = lookup.component(checkout, Visibility::Public);
        assert!(view.cover.as_ref().unwrap().meta.is_none());
        assert!(view.gallery.0.iter().all(|item| item.meta.is_none()));
        let project = view.project.unwrap();
        assert!(project.cover.unwrap().meta.is_none());
        assert!(project.logo.unwrap().meta.is_none());
        assert!(project.gallery.0.iter().all(|item| item.meta.is_none()));
    }

    #[test]
    fn filter_names_keep_order_and_nulls() {
        let web = category("Web");
        let mobile = category("Mobile");
        let gone = Uuid::new_v4();
        let names = NameLookup::new(
            Lookup::default().with_categories(vec![web.clone(), mobile.clone()]),
            Vec::new(),
        );

        let filter = ComponentFilter {
            category_ids: vec![mobile.id, gone, web.id],
            ..Default::default()
        };
        let named = names.named(&filter);
        assert_eq!(named.categories.len(), 3);
        assert_eq!(named.categories[0].as_ref().unwrap().name, "Mobile");
        assert!(named.categories[1].is_none());
        assert_eq!(named.categories[2].as_ref().unwrap().name, "Web");
    }

    #[test]
    fn unique_ids_keeps_first_occurrence() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(unique_ids([a, b, a, b]), vec![a, b]);
    }
}
