//! Value objects stored inline (as JSON columns) on projects, components,
//! categories and technologies.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An icon reference, e.g. `{ "type": "fontawesome", "name": "code" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Icon {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

/// Opaque metadata of an object held by the object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StorageObject {
    pub bucket: String,
    pub object: String,
    pub content_type: String,
    pub size: i64,
}

/// Public link to an uploaded image plus the storage metadata needed to delete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ImageUpload {
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<StorageObject>,
}

impl ImageUpload {
    /// Drops the storage metadata for public consumption.
    pub fn public(self) -> Self {
        Self {
            link: self.link,
            meta: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<StorageObject>,
}

/// Ordered list of gallery images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Gallery(pub Vec<GalleryItem>);

impl Gallery {
    pub fn push(&mut self, item: GalleryItem) {
        self.0.push(item);
    }

    /// Removes the item with `id`, returning it when present.
    pub fn remove(&mut self, id: Uuid) -> Option<GalleryItem> {
        let index = self.0.iter().position(|item| item.id == id)?;
        Some(self.0.remove(index))
    }

    pub fn public(self) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|item| GalleryItem { meta: None, ..item })
                .collect(),
        )
    }
}

/// Image attachment points of projects and components; doubles as the multipart field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Cover,
    Logo,
    Gallery,
}

impl ImageSlot {
    pub fn field_name(self) -> &'static str {
        match self {
            ImageSlot::Cover => "cover",
            ImageSlot::Logo => "logo",
            ImageSlot::Gallery => "gallery",
        }
    }
}

/// An outbound link of a component: app store page, web app, blog post...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLink {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Links(pub Vec<ComponentLink>);

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> StorageObject {
        StorageObject {
            bucket: "uploads".to_string(),
            object: "a.png".to_string(),
            content_type: "image/png".to_string(),
            size: 12,
        }
    }

    #[test]
    fn public_gallery_strips_metadata() {
        let gallery = Gallery(vec![GalleryItem {
            id: Uuid::new_v4(),
            name: Some("home".to_string()),
            description: None,
            link: "http://localhost/uploads/a.png".to_string(),
            meta: Some(meta()),
        }]);

        let public = gallery.public();
        assert!(public.0[0].meta.is_none());
        let json = serde_json::to_value(&public).unwrap();
        assert!(json[0].get("meta").is_none());
        assert_eq!(json[0]["name"], "home");
    }

    #[test]
    fn gallery_remove_returns_the_item() {
        let id = Uuid::new_v4();
        let mut gallery = Gallery::default();
        gallery.push(GalleryItem {
            id,
            name: None,
            description: None,
            link: "l".to_string(),
            meta: Some(meta()),
        });

        assert_eq!(gallery.remove(Uuid::new_v4()), None);
        assert_eq!(gallery.remove(id).map(|item| item.id), Some(id));
        assert!(gallery.0.is_empty());
    }

    #[test]
    fn icon_uses_type_key() {
        let icon: Icon = serde_json::from_str(r#"{"type":"material","name":"web"}"#).unwrap();
        assert_eq!(icon.kind, "material");
    }
}
