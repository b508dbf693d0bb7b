use actix_web::{HttpResponse, web};

use super::{snapshot, user_by_username};
use crate::auth::middleware::{AuthenticatedUser, OptionalUser};
use crate::db::settings as settings_db;
use crate::error::AppResult;
use crate::models::site_settings::{SettingsResponse, UpdateSettings};
use crate::services::history;
use crate::services::validation::Validate;
use crate::state::AppState;

/// GET /api/settings: the caller's settings, else the global ones.
pub async fn get_settings(
    OptionalUser(caller): OptionalUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let settings = settings_db::resolve(&state.db, caller.map(|u| u.id)).await?;
    Ok(HttpResponse::Ok().json(settings))
}

/// GET /api/settings/{username}
pub async fn get_user_settings(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let owner = user_by_username(&state, &path.into_inner()).await?;
    let settings = settings_db::resolve(&state.db, Some(owner.id)).await?;
    Ok(HttpResponse::Ok().json(settings))
}

/// PUT /api/settings
pub async fn update_settings(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<UpdateSettings>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    input.validate()?;

    let before = settings_db::find_for_owner(&state.db, Some(user.id)).await?;
    let updated = SettingsResponse::from(settings_db::update(&state.db, user.id, input).await?);
    history::record(
        &state.db,
        user.id,
        "settings",
        "site",
        "update",
        before.as_ref().and_then(snapshot),
        snapshot(&updated),
    )
    .await;

    Ok(HttpResponse::Ok().json(updated))
}
