//! Local-disk object storage. Objects are served under `/uploads`.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::media::{ImageUpload, StorageObject};
use crate::upload::UploadedFile;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        let root = root.into();
        let bucket = root
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "uploads".to_string());
        Self {
            root,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    pub fn public_link(&self, object: &str) -> String {
        format!("{}/uploads/{object}", self.public_base_url)
    }

    /// Write the file under a fresh object name.
    pub async fn store(&self, file: &UploadedFile) -> Result<ImageUpload, ApiError> {
        let object = match file.extension() {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };

        tokio::fs::write(self.root.join(&object), &file.bytes)
            .await
            .map_err(|e| ApiError::Storage(format!("Failed to write {object}: {e}")))?;

        let content_type = file
            .content_type
            .clone()
            .or_else(|| mime_guess::from_path(&object).first())
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(ImageUpload {
            link: self.public_link(&object),
            meta: Some(StorageObject {
                bucket: self.bucket.clone(),
                size: file.size() as i64,
                object,
                content_type,
            }),
        })
    }

    /// Remove an object. Objects that are already gone are ignored.
    pub async fn delete(&self, meta: &StorageObject) -> Result<(), ApiError> {
        if meta.object.contains(['/', '\\']) || meta.object.starts_with('.') {
            return Err(ApiError::Storage(format!(
                "Refusing to delete object {}",
                meta.object
            )));
        }
        match tokio::fs::remove_file(self.root.join(&meta.object)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(format!(
                "Failed to delete {}: {e}",
                meta.object
            ))),
        }
    }

    /// Delete a replaced image, logging instead of failing.
    pub async fn discard(&self, meta: Option<&StorageObject>) {
        let Some(meta) = meta else {
            return;
        };
        if let Err(e) = self.delete(meta).await {
            tracing::warn!(object = %meta.object, "failed to delete stored object: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn temp_storage() -> LocalStorage {
        let root = std::env::temp_dir().join(format!("showcase-uploads-{}", Uuid::new_v4()));
        LocalStorage::new(root, "http://localhost:8080/")
    }

    fn png() -> UploadedFile {
        UploadedFile {
            field_name: "cover".to_string(),
            file_name: "Cover.PNG".to_string(),
            content_type: None,
            bytes: Bytes::from_static(b"\x89PNG\r\n"),
        }
    }

    #[tokio::test]
    async fn stores_and_deletes_objects() {
        let storage = temp_storage();
        storage.ensure_root().await.unwrap();

        let image = storage.store(&png()).await.unwrap();
        let meta = image.meta.clone().unwrap();
        assert!(meta.object.ends_with(".png"));
        assert_eq!(meta.content_type, "image/png");
        assert_eq!(meta.size, 6);
        assert_eq!(image.link, format!("http://localhost:8080/uploads/{}", meta.object));
        assert!(storage.root().join(&meta.object).exists());

        storage.delete(&meta).await.unwrap();
        assert!(!storage.root().join(&meta.object).exists());
        // already gone
        storage.delete(&meta).await.unwrap();

        tokio::fs::remove_dir_all(storage.root()).await.unwrap();
    }

    #[tokio::test]
    async fn refuses_paths_outside_the_root() {
        let storage = temp_storage();
        let meta = StorageObject {
            bucket: "uploads".to_string(),
            object: "../secret".to_string(),
            content_type: "image/png".to_string(),
            size: 1,
        };
        assert!(matches!(
            storage.delete(&meta).await,
            Err(ApiError::Storage(_))
        ));
    }
}
