//! Object storage for uploaded images.
//!
//! Keys are tenant-scoped: `{restaurant_id}/{uuid}.{ext}` for product
//! images and `{restaurant_id}/logo-{uuid}.{ext}` for logos. The default
//! backend writes under a local directory that the server exposes at `/media`.

use std::future::Future;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use qresto_core::RestaurantId;

/// Accepted image extensions.
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Errors from validating or storing an upload.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported file format '{0}'")]
    UnsupportedFormat(String),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A blob store with public URLs.
pub trait ObjectStorage: Send + Sync {
    /// Write `data` under `key`, replacing any existing object.
    fn put(
        &self,
        key: &str,
        data: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Public URL for `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Filesystem-backed storage.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Store files under `root`, served publicly from `base_url`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let only_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !only_normal {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStorage for LocalStorage {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }
}

/// What an upload is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ProductImage,
    Logo,
}

/// An image received from a form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Lowercased extension of `file_name`, if it is a supported format.
///
/// # Errors
///
/// Returns `StorageError::UnsupportedFormat` otherwise.
pub fn image_extension(file_name: &str) -> Result<String, StorageError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if SUPPORTED_FORMATS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(StorageError::UnsupportedFormat(ext))
    }
}

/// Build a fresh tenant-scoped key.
#[must_use]
pub fn upload_key(restaurant_id: RestaurantId, kind: UploadKind, ext: &str) -> String {
    let id = Uuid::new_v4();
    match kind {
        UploadKind::ProductImage => format!("{restaurant_id}/{id}.{ext}"),
        UploadKind::Logo => format!("{restaurant_id}/logo-{id}.{ext}"),
    }
}

/// Validate and store an image, returning its public URL.
///
/// # Errors
///
/// Returns `StorageError` if the file is too large, has an unsupported
/// extension, or cannot be written.
pub async fn store_image<S: ObjectStorage>(
    storage: &S,
    restaurant_id: RestaurantId,
    kind: UploadKind,
    upload: &ImageUpload,
    max_bytes: usize,
) -> Result<String, StorageError> {
    if upload.data.len() > max_bytes {
        return Err(StorageError::TooLarge {
            size: upload.data.len(),
            max: max_bytes,
        });
    }
    let ext = image_extension(&upload.file_name)?;
    let key = upload_key(restaurant_id, kind, &ext);
    storage.put(&key, &upload.data).await?;
    tracing::info!(%restaurant_id, key = %key, bytes = upload.data.len(), "Stored upload");
    Ok(storage.public_url(&key))
}

/// Like [`store_image`], but a failure only logs a warning and yields `None`.
///
/// The caller saves its row without the image and tells the user.
pub async fn store_image_or_skip<S: ObjectStorage>(
    storage: &S,
    restaurant_id: RestaurantId,
    kind: UploadKind,
    upload: &ImageUpload,
    max_bytes: usize,
) -> Option<String> {
    match store_image(storage, restaurant_id, kind, upload, max_bytes).await {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(%restaurant_id, file = %upload.file_name, error = %e, "Upload failed; saving without image");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn upload(name: &str, size: usize) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            data: vec![0u8; size],
        }
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("pizza.PNG").unwrap(), "png");
        assert_eq!(image_extension("logo.webp").unwrap(), "webp");
        assert!(matches!(
            image_extension("menu.pdf"),
            Err(StorageError::UnsupportedFormat(_))
        ));
        assert!(image_extension("no-extension").is_err());
    }

    #[test]
    fn test_upload_key_is_tenant_scoped() {
        let restaurant_id = RestaurantId::generate();
        let key = upload_key(restaurant_id, UploadKind::ProductImage, "jpg");
        assert!(key.starts_with(&format!("{restaurant_id}/")));
        assert!(key.ends_with(".jpg"));

        let logo = upload_key(restaurant_id, UploadKind::Logo, "png");
        assert!(logo.starts_with(&format!("{restaurant_id}/logo-")));
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let storage = LocalStorage::new("/tmp/media", "http://localhost/media");
        assert!(storage.path_for("../etc/passwd").is_err());
        assert!(storage.path_for("/abs.png").is_err());
        assert!(storage.path_for("").is_err());
        assert!(storage.path_for("r/img.png").is_ok());
    }

    #[tokio::test]
    async fn test_store_image_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:3000/media/");
        let restaurant_id = RestaurantId::generate();

        let url = store_image(
            &storage,
            restaurant_id,
            UploadKind::ProductImage,
            &upload("pizza.jpg", 16),
            1024,
        )
        .await
        .unwrap();

        let prefix = format!("http://localhost:3000/media/{restaurant_id}/");
        assert!(url.starts_with(&prefix));
        let key = url.trim_start_matches("http://localhost:3000/media/");
        assert_eq!(std::fs::read(dir.path().join(key)).unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_store_image_rejects_large_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost/media");
        let err = store_image(
            &storage,
            RestaurantId::generate(),
            UploadKind::Logo,
            &upload("logo.png", 2048),
            1024,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorageError::TooLarge { size: 2048, max: 1024 }));
    }

    #[tokio::test]
    async fn test_store_image_or_skip_swallows_errors() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost/media");
        let url = store_image_or_skip(
            &storage,
            RestaurantId::generate(),
            UploadKind::ProductImage,
            &upload("menu.gif", 10),
            1024,
        )
        .await;
        assert_eq!(url, None);
    }
}
