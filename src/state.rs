use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::cache::SharedCache;
use crate::config::AppConfig;
use crate::rate_limit::RateLimiter;
use crate::services::theme::ThemeResolver;
use crate::storage::SharedStorage;

/// Everything a handler needs, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub storage: SharedStorage,
    pub cache: SharedCache,
    pub themes: ThemeResolver,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: AppConfig,
        storage: SharedStorage,
        cache: SharedCache,
        limiter: RateLimiter,
    ) -> Self {
        let themes = ThemeResolver::new(
            storage.clone(),
            cache.clone(),
            config.theme_not_found_ttl,
        );
        Self {
            db,
            config: Arc::new(config),
            storage,
            cache,
            themes,
            limiter,
        }
    }

    /// Base URL for `/api/images/...` links in responses.
    pub fn api_base(&self) -> &str {
        &self.config.public_api_url
    }
}
