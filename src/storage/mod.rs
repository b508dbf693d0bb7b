//! Object storage adapter.
//!
//! The backend never hands out bucket URLs: files are written under relative
//! keys and streamed back through `/api/images/*`.

mod memory;
mod s3;

pub use memory::MemoryStorage;
pub use s3::S3Storage;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::images::KEY_PREFIX;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The key does not exist. Expected in normal operation (e.g. no custom theme yet).
    #[error("object not found: {0}")]
    NotFound(String),
    /// Connectivity, permission or protocol failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

pub type SharedStorage = Arc<dyn ObjectStorage>;

/// Upload category, mirrored in the key layout `uploads/<category>/<user>/<file>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    Profile,
    Portfolio,
    Widget,
}

impl UploadCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::Profile => "profile",
            UploadCategory::Portfolio => "portfolio",
            UploadCategory::Widget => "widget",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "profile" => Some(UploadCategory::Profile),
            "portfolio" => Some(UploadCategory::Portfolio),
            "widget" => Some(UploadCategory::Widget),
            _ => None,
        }
    }
}

/// `uploads/<category>/<user>/`: everything a user uploaded in one category.
pub fn upload_key_prefix(category: UploadCategory, user_id: Uuid) -> String {
    format!("{KEY_PREFIX}{}/{user_id}/", category.as_str())
}

/// Generate a fresh relative key for an uploaded file.
pub fn upload_key(category: UploadCategory, user_id: Uuid, extension: &str) -> String {
    format!(
        "{}{}.{extension}",
        upload_key_prefix(category, user_id),
        Uuid::new_v4()
    )
}

/// Best-effort delete of an object that is being replaced. Missing objects and
/// backend failures are logged, never propagated.
pub async fn delete_quietly(storage: &dyn ObjectStorage, key: &str) {
    match storage.delete(key).await {
        Ok(()) | Err(StorageError::NotFound(_)) => {}
        Err(e) => tracing::warn!(key, "failed to delete replaced object: {e}"),
    }
}
