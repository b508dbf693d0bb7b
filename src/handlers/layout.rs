use actix_web::{HttpResponse, web};

use super::{snapshot, user_by_username};
use crate::auth::middleware::{AuthenticatedUser, OptionalUser};
use crate::error::AppResult;
use crate::models::layouts::{LayoutQuery, LayoutResponse, UpdateLayout};
use crate::services::{history, layout};
use crate::state::AppState;

/// GET /api/layout?username=&includeHidden=
///
/// With `username`, that user's page layout (visible widgets unless asked
/// otherwise). Without it, the caller's own layout with hidden widgets, or
/// the global default for anonymous callers.
pub async fn get_layout(
    OptionalUser(caller): OptionalUser,
    state: web::Data<AppState>,
    query: web::Query<LayoutQuery>,
) -> AppResult<HttpResponse> {
    let LayoutQuery {
        username,
        include_hidden,
    } = query.into_inner();

    let (owner, hidden_by_default) = match username.filter(|u| !u.trim().is_empty()) {
        Some(username) => (Some(user_by_username(&state, &username).await?.id), false),
        None => match caller {
            Some(user) => (Some(user.id), true),
            None => (None, false),
        },
    };

    let resolved =
        layout::resolve(&state.db, owner, include_hidden.unwrap_or(hidden_by_default)).await?;
    Ok(HttpResponse::Ok().json(LayoutResponse::build(resolved, state.api_base())))
}

/// POST /api/layout: make sure the caller has a layout and return it.
pub async fn create_layout(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let resolved = layout::resolve(&state.db, Some(user.id), true).await?;
    Ok(HttpResponse::Ok().json(LayoutResponse::build(resolved, state.api_base())))
}

/// PUT /api/layout: partial update of the caller's current layout.
pub async fn update_layout(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<UpdateLayout>,
) -> AppResult<HttpResponse> {
    let current = layout::resolve(&state.db, Some(user.id), true).await?;
    let old_value = snapshot(&LayoutResponse::build(current.clone(), state.api_base()));

    let updated = layout::update(&state.db, current.layout, body.into_inner()).await?;
    let response = LayoutResponse::build(updated, state.api_base());
    history::record(
        &state.db,
        user.id,
        "layout",
        "layout",
        "update",
        old_value,
        snapshot(&response),
    )
    .await;

    Ok(HttpResponse::Ok().json(response))
}
