use actix_web::{HttpResponse, web};

use super::{snapshot, user_by_username};
use crate::auth::middleware::{AuthenticatedUser, OptionalUser};
use crate::db::theme_prefs;
use crate::error::{AppError, AppResult};
use crate::models::theme_preferences::{ThemePreferenceResponse, UpdateThemePreference};
use crate::services::history;
use crate::services::theme::default_theme;
use crate::services::validation::{Validate, normalize_username};
use crate::state::AppState;

// ── Theme config objects (object storage) ──

/// GET /api/theme-config
pub async fn get_default_theme_config() -> HttpResponse {
    HttpResponse::Ok().json(default_theme())
}

/// GET /api/theme-config/{username}: the default merged with the user's override.
pub async fn get_theme_config(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.themes.resolve(&path.into_inner()).await)
}

/// PUT /api/theme-config: replace the caller's override.
pub async fn update_theme_config(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> AppResult<HttpResponse> {
    let overlay = body.into_inner();
    let previous = state.themes.load_override(&user.username).await;
    let merged = state
        .themes
        .save_override(&user.username, overlay.clone())
        .await?;
    history::record(
        &state.db,
        user.id,
        "theme",
        "config",
        "update",
        previous,
        Some(overlay),
    )
    .await;

    Ok(HttpResponse::Ok().json(merged))
}

// ── Theme preference rows ──

/// GET /api/theme: the caller's preference, else the global one.
pub async fn get_theme(
    OptionalUser(caller): OptionalUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let theme = theme_prefs::resolve(&state.db, caller.map(|u| u.id)).await?;
    Ok(HttpResponse::Ok().json(theme))
}

/// GET /api/theme/{username}
pub async fn get_user_theme(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let owner = user_by_username(&state, &path.into_inner()).await?;
    let theme = theme_prefs::resolve(&state.db, Some(owner.id)).await?;
    Ok(HttpResponse::Ok().json(theme))
}

async fn save_preference(
    user: &AuthenticatedUser,
    state: &AppState,
    input: UpdateThemePreference,
) -> AppResult<HttpResponse> {
    input.validate()?;
    let before = theme_prefs::find_for_owner(&state.db, Some(user.id)).await?;
    let saved = ThemePreferenceResponse::from(theme_prefs::upsert(&state.db, user.id, input).await?);
    history::record(
        &state.db,
        user.id,
        "theme",
        "preference",
        "update",
        before.as_ref().and_then(snapshot),
        snapshot(&saved),
    )
    .await;

    Ok(HttpResponse::Ok().json(saved))
}

/// PUT /api/theme
pub async fn update_theme(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<UpdateThemePreference>,
) -> AppResult<HttpResponse> {
    save_preference(&user, &state, body.into_inner()).await
}

/// PUT /api/theme/{username}: only the caller's own username is accepted.
pub async fn update_user_theme(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateThemePreference>,
) -> AppResult<HttpResponse> {
    if normalize_username(&path.into_inner()) != user.username {
        return Err(AppError::Forbidden(
            "ไม่สามารถแก้ไขธีมของผู้ใช้อื่นได้".to_string(),
        ));
    }
    save_preference(&user, &state, body.into_inner()).await
}
