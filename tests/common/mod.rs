//! Shared harness: a throw-away SQLite database with the real migrations,
//! an in-memory object store, and the full route table.

#![allow(dead_code)]

use actix_web::http::header;
use actix_web::test::TestRequest;
use actix_web::web;
use sea_orm::{ConnectOptions, Database};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use folio_backend::cache::{MemoryCache, SharedCache};
use folio_backend::config::AppConfig;
use folio_backend::rate_limit::RateLimiter;
use folio_backend::state::AppState;
use folio_backend::storage::MemoryStorage;
use migration::{Migrator, MigratorTrait};

/// A fake secret for testing, never a real one.
pub const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub storage: Arc<MemoryStorage>,
    db_path: PathBuf,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

pub async fn setup() -> TestContext {
    setup_with(AppConfig::for_tests(TEST_SECRET)).await
}

pub async fn setup_with(config: AppConfig) -> TestContext {
    let db_path = std::env::temp_dir().join(format!("folio-test-{}.db", Uuid::new_v4()));
    let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", db_path.display()));
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let storage = Arc::new(MemoryStorage::new());
    let cache: SharedCache = Arc::new(MemoryCache::default());
    let limiter = RateLimiter::in_memory(config.rate_limit.clone());
    let state = web::Data::new(AppState::new(db, config, storage.clone(), cache, limiter));

    TestContext {
        state,
        storage,
        db_path,
    }
}

/// Build the service under test from a [`TestContext`].
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .configure(folio_backend::configure),
        )
        .await
    };
}

pub fn register_req(username: &str, email: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        }))
}

pub fn login_req(username: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": username, "password": password }))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Smallest valid PNG signature plus a little padding.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 32]);
    bytes
}

pub const BOUNDARY: &str = "----folio-test-boundary";

/// A `multipart/form-data` body with text fields followed by one file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> (header::HeaderName, String) {
    (
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    )
}
