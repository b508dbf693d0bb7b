use actix_web::{HttpResponse, web};
use serde::Serialize;

use super::user_by_username;
use crate::db::{content as content_db, settings as settings_db, theme_prefs};
use crate::error::AppResult;
use crate::models::layouts::LayoutResponse;
use crate::models::page_contents::ContentResponse;
use crate::models::site_settings::SettingsResponse;
use crate::models::theme_preferences::ThemePreferenceResponse;
use crate::services::layout;
use crate::state::AppState;

/// Everything the `/{username}` page renders, in one response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub content: ContentResponse,
    pub layout: LayoutResponse,
    pub theme: serde_json::Value,
    pub theme_preference: ThemePreferenceResponse,
    pub settings: SettingsResponse,
}

/// GET /api/page/{username}
pub async fn get_page(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let owner = user_by_username(&state, &path.into_inner()).await?;
    let api_base = state.api_base();

    let content = content_db::get_or_create_content(&state.db, owner.id).await?;
    let children = content_db::load_children(&state.db, content.id).await?;
    let resolved = layout::resolve(&state.db, Some(owner.id), false).await?;

    Ok(HttpResponse::Ok().json(PageResponse {
        content: ContentResponse::build(content, children, &owner.username, api_base),
        layout: LayoutResponse::build(resolved, api_base),
        theme: state.themes.resolve(&owner.username).await,
        theme_preference: theme_prefs::resolve(&state.db, Some(owner.id)).await?,
        settings: settings_db::resolve(&state.db, Some(owner.id)).await?,
    }))
}
