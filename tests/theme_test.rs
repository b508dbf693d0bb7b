//! Theme defaults, deep-merge semantics, and the storage-backed resolver.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use folio_backend::cache::{MemoryCache, SharedCache, TtlCache, keys};
use folio_backend::services::theme::{
    ThemeResolver, deep_merge, default_theme, theme_key, validate_override,
};
use folio_backend::storage::{MemoryStorage, ObjectStorage, StorageError};

#[test]
fn test_objects_merge_and_arrays_replace() {
    let base = default_theme();
    let overlay = json!({
        "colors": { "primary": "#000000" },
        "header": { "menuLinks": [{ "label": "Blog", "href": "/blog" }] }
    });

    let merged = deep_merge(&base, &overlay);

    assert_eq!(merged["colors"]["primary"], "#000000");
    assert_eq!(merged["colors"]["secondary"], base["colors"]["secondary"]);
    assert_eq!(merged["header"]["title"], base["header"]["title"]);
    assert_eq!(
        merged["header"]["menuLinks"],
        json!([{ "label": "Blog", "href": "/blog" }])
    );
    assert_eq!(merged["footer"], base["footer"]);
}

#[test]
fn test_null_keeps_base_and_new_keys_are_added() {
    let base = json!({ "a": 1, "b": { "c": 2 } });
    let merged = deep_merge(&base, &json!({ "a": null, "b": { "d": 3 }, "e": [1] }));
    assert_eq!(merged, json!({ "a": 1, "b": { "c": 2, "d": 3 }, "e": [1] }));
}

#[test]
fn test_override_validation() {
    assert!(validate_override(&json!({ "colors": { "primary": "#fff" } })).is_ok());
    assert!(validate_override(&json!([1, 2])).is_err());
    assert!(validate_override(&json!({ "unknown": {} })).is_err());
    assert!(validate_override(&json!({ "colors": { "primary": "red" } })).is_err());
    assert!(validate_override(&json!({ "footer": { "socialLinks": "nope" } })).is_err());
}

#[test]
fn test_theme_key_is_normalized() {
    assert_eq!(theme_key("  Alice "), "themes/alice.json");
}

/// Counts reads so tests can tell whether storage was consulted.
#[derive(Default)]
struct CountingStorage {
    inner: MemoryStorage,
    gets: std::sync::atomic::AtomicUsize,
}

#[async_trait::async_trait]
impl ObjectStorage for CountingStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), folio_backend::storage::StorageError> {
        self.inner.put(key, bytes, content_type).await
    }

    async fn get(
        &self,
        key: &str,
    ) -> Result<folio_backend::storage::StoredObject, folio_backend::storage::StorageError> {
        self.gets.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), folio_backend::storage::StorageError> {
        self.inner.delete(key).await
    }
}

#[tokio::test]
async fn test_missing_override_is_cached() {
    let storage = Arc::new(CountingStorage::default());
    let cache: SharedCache = Arc::new(MemoryCache::default());
    let resolver = ThemeResolver::new(storage.clone(), cache.clone(), Duration::from_secs(60));

    assert_eq!(resolver.resolve("bob").await, default_theme());
    assert_eq!(resolver.resolve("BOB").await, default_theme());

    assert_eq!(storage.gets.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(cache.get(&keys::theme_missing("bob")).await.unwrap().is_some());
}

#[tokio::test]
async fn test_saving_override_invalidates_cached_miss() {
    let storage = Arc::new(MemoryStorage::new());
    let cache: SharedCache = Arc::new(MemoryCache::default());
    let resolver = ThemeResolver::new(storage.clone(), cache, Duration::from_secs(60));

    assert_eq!(resolver.resolve("carol").await, default_theme());

    let merged = resolver
        .save_override("carol", json!({ "fonts": { "body": "Inter" } }))
        .await
        .unwrap();
    assert_eq!(merged["fonts"]["body"], "Inter");
    assert!(storage.contains("themes/carol.json").await);

    let resolved = resolver.resolve("carol").await;
    assert_eq!(resolved["fonts"]["body"], "Inter");
    assert_eq!(resolved["fonts"]["heading"], default_theme()["fonts"]["heading"]);
}

#[tokio::test]
async fn test_corrupt_override_falls_back_to_default() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .put("themes/dave.json", b"not json".to_vec(), "application/json")
        .await
        .unwrap();
    let resolver = ThemeResolver::new(
        storage,
        Arc::new(MemoryCache::default()),
        Duration::from_secs(60),
    );

    assert_eq!(resolver.resolve("dave").await, default_theme());
}

#[tokio::test]
async fn test_cached_miss_expires_after_its_ttl() {
    let storage = Arc::new(CountingStorage::default());
    let cache: SharedCache = Arc::new(MemoryCache::default());
    let resolver = ThemeResolver::new(storage.clone(), cache, Duration::from_millis(50));

    assert_eq!(resolver.resolve("erin").await, default_theme());
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(resolver.resolve("erin").await, default_theme());

    assert_eq!(storage.gets.load(std::sync::atomic::Ordering::SeqCst), 2);
}

/// Every read fails as if the bucket were unreachable.
#[derive(Default)]
struct UnreachableStorage {
    gets: std::sync::atomic::AtomicUsize,
}

#[async_trait::async_trait]
impl ObjectStorage for UnreachableStorage {
    async fn put(&self, _: &str, _: Vec<u8>, _: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("connection refused".to_string()))
    }

    async fn get(&self, _: &str) -> Result<folio_backend::storage::StoredObject, StorageError> {
        self.gets.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Err(StorageError::Backend("connection refused".to_string()))
    }

    async fn delete(&self, _: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_backend_errors_are_not_cached_as_missing() {
    let storage = Arc::new(UnreachableStorage::default());
    let cache: SharedCache = Arc::new(MemoryCache::default());
    let resolver = ThemeResolver::new(storage.clone(), cache.clone(), Duration::from_secs(60));

    assert_eq!(resolver.resolve("frank").await, default_theme());
    assert_eq!(resolver.resolve("frank").await, default_theme());

    assert_eq!(storage.gets.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert!(cache.get(&keys::theme_missing("frank")).await.unwrap().is_none());
}
