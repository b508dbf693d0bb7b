use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use dotenv::dotenv;
use folio_backend::cache::{MemoryCache, RedisCache, SharedCache};
use folio_backend::config::AppConfig;
use folio_backend::rate_limit::RateLimiter;
use folio_backend::state::AppState;
use folio_backend::storage::{MemoryStorage, S3Storage, SharedStorage};
use folio_backend::{configure, create_pool};
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(|e| startup_error("invalid configuration", e))?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(|e| startup_error("failed to connect to database", e))?;
    Migrator::up(&db, None)
        .await
        .map_err(|e| startup_error("failed to run migrations", e))?;
    tracing::info!("Database ready");

    let storage: SharedStorage = match &config.storage.endpoint {
        Some(endpoint) => {
            tracing::info!(endpoint, bucket = %config.storage.bucket, "Using S3 object storage");
            Arc::new(S3Storage::connect(&config.storage).await)
        }
        None => {
            tracing::warn!("S3_ENDPOINT not set, uploads are kept in memory and lost on restart");
            Arc::new(MemoryStorage::new())
        }
    };

    // Redis, when configured, backs both the cache and the rate-limit counters.
    let (cache, limiter): (SharedCache, RateLimiter) = match &config.redis_url {
        Some(url) => {
            let redis = RedisCache::new(url)
                .await
                .map_err(|e| startup_error("failed to connect to Redis", e))?;
            tracing::info!("Connected to Redis");
            (
                Arc::new(redis.clone()),
                RateLimiter::new(config.rate_limit.clone(), Arc::new(redis)),
            )
        }
        None => (
            Arc::new(MemoryCache::default()),
            RateLimiter::in_memory(config.rate_limit.clone()),
        ),
    };
    if config.rate_limit.enabled {
        limiter.spawn_sweeper();
    }

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let allowed_origins = config.allowed_origins.clone();
    let state = web::Data::new(AppState::new(db, config, storage, cache, limiter));
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));
        let cors = if allowed_origins.is_empty() {
            cors.allow_any_origin()
        } else {
            cors
        }
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::RETRY_AFTER,
            header::HeaderName::from_static("x-ratelimit-limit"),
            header::HeaderName::from_static("x-ratelimit-remaining"),
            header::HeaderName::from_static("x-ratelimit-reset"),
        ])
        .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
