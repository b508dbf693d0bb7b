pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod images;
pub mod models;
pub mod rate_limit;
pub mod services;
pub mod state;
pub mod storage;

pub use db::create_pool;

use actix_web::middleware::from_fn;
use actix_web::web;

/// Mount the JSON API under `/api`, behind the rate limiter.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(
            web::scope("/api")
                .wrap(from_fn(rate_limit::middleware::rate_limit))
                .configure(handlers::init_routes),
        );
}
