pub mod auth;
pub mod contact;
pub mod content;
pub mod health;
pub mod history;
pub mod images;
pub mod layout;
pub mod page;
pub mod settings;
pub mod theme;
pub mod upload;
pub mod widgets;

use actix_web::web;
use serde::Serialize;

use crate::db::users as user_db;
use crate::error::{AppError, AppResult};
use crate::models::users;
use crate::services::validation::normalize_username;
use crate::state::AppState;

/// The user a public `/{username}` route refers to, or a 404.
pub(crate) async fn user_by_username(state: &AppState, username: &str) -> AppResult<users::Model> {
    let username = normalize_username(username);
    user_db::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::NotFound("ไม่พบผู้ใช้".to_string()))
}

/// Snapshot for an edit-history row.
pub(crate) fn snapshot<T: Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health));

    // ── Auth ──
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/me", web::get().to(auth::me))
            .route("/session-policy", web::put().to(auth::update_session_policy)),
    );

    // ── Profile and page content ──
    cfg.service(
        web::resource("/profile")
            .route(web::get().to(content::get_profile))
            .route(web::put().to(content::update_profile)),
    );
    cfg.service(
        web::resource("/content/me")
            .route(web::get().to(content::get_my_content))
            .route(web::put().to(content::update_my_content)),
    );
    cfg.route("/content/{username}", web::get().to(content::get_content));

    // ── Layout and widgets ──
    cfg.service(
        web::resource("/layout")
            .route(web::get().to(layout::get_layout))
            .route(web::post().to(layout::create_layout))
            .route(web::put().to(layout::update_layout)),
    );
    cfg.service(
        web::scope("/widgets")
            .route("", web::get().to(widgets::list_widgets))
            .route("", web::post().to(widgets::create_widget))
            .route("/reorder", web::put().to(widgets::reorder_widgets))
            .route("/{id}", web::put().to(widgets::update_widget))
            .route("/{id}", web::delete().to(widgets::delete_widget)),
    );

    // ── Contact messages ──
    cfg.service(
        web::scope("/contact")
            .route("", web::post().to(contact::submit_message))
            .route("", web::get().to(contact::list_messages))
            .route("/{id}/read", web::put().to(contact::mark_read))
            .route("/{id}", web::delete().to(contact::delete_message)),
    );

    // ── Settings and themes ──
    cfg.service(
        web::scope("/settings")
            .route("", web::get().to(settings::get_settings))
            .route("", web::put().to(settings::update_settings))
            .route("/{username}", web::get().to(settings::get_user_settings)),
    );
    cfg.service(
        web::scope("/theme-config")
            .route("", web::get().to(theme::get_default_theme_config))
            .route("", web::put().to(theme::update_theme_config))
            .route("/{username}", web::get().to(theme::get_theme_config)),
    );
    cfg.service(
        web::scope("/theme")
            .route("", web::get().to(theme::get_theme))
            .route("", web::put().to(theme::update_theme))
            .route("/{username}", web::get().to(theme::get_user_theme))
            .route("/{username}", web::put().to(theme::update_user_theme)),
    );

    // ── Files ──
    cfg.route("/upload/{category}", web::post().to(upload::upload_image));
    cfg.route("/images/{key:.*}", web::get().to(images::serve_image));

    // ── Edit history and the public page ──
    cfg.service(
        web::resource("/admin/edit-history")
            .route(web::get().to(history::list_history))
            .route(web::post().to(history::create_history)),
    );
    cfg.route("/page/{username}", web::get().to(page::get_page));
}
