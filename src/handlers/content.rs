use actix_web::{HttpResponse, web};

use super::{snapshot, user_by_username};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::content as content_db;
use crate::error::AppResult;
use crate::images::{self, DataUriPolicy};
use crate::models::page_contents::{ContentResponse, ProfileResponse, UpdateContent, UpdateProfile};
use crate::models::portfolios::PortfolioInput;
use crate::services::history;
use crate::state::AppState;

/// Rewrite incoming image references to storage keys. Empty means "clear".
fn normalize_image(input: Option<String>, policy: DataUriPolicy) -> AppResult<Option<String>> {
    input
        .map(|raw| images::for_storage(&raw, policy).map(Option::unwrap_or_default))
        .transpose()
}

fn normalize_profile(mut input: UpdateProfile) -> AppResult<UpdateProfile> {
    input.profile_image = normalize_image(input.profile_image, DataUriPolicy::Allow)?;
    input.about_image = normalize_image(input.about_image, DataUriPolicy::Allow)?;
    Ok(input)
}

fn normalize_portfolio(items: Vec<PortfolioInput>) -> AppResult<Vec<PortfolioInput>> {
    items
        .into_iter()
        .map(|mut item| {
            item.image = normalize_image(item.image, DataUriPolicy::Reject)?;
            Ok(item)
        })
        .collect()
}

/// GET /api/profile
pub async fn get_profile(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let content = content_db::get_or_create_content(&state.db, user.id).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::build(content, &user.username, state.api_base())))
}

/// PUT /api/profile: personal fields only.
pub async fn update_profile(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<UpdateProfile>,
) -> AppResult<HttpResponse> {
    let input = normalize_profile(body.into_inner())?;
    let before = content_db::get_or_create_content(&state.db, user.id).await?;
    let old_value = snapshot(&before);

    let updated = content_db::update_fields(&state.db, before, input.clone()).await?;
    history::record(
        &state.db,
        user.id,
        "profile",
        "profile",
        "update",
        old_value,
        snapshot(&input),
    )
    .await;

    Ok(HttpResponse::Ok().json(ProfileResponse::build(updated, &user.username, state.api_base())))
}

/// GET /api/content/me
pub async fn get_my_content(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let content = content_db::get_or_create_content(&state.db, user.id).await?;
    let children = content_db::load_children(&state.db, content.id).await?;
    Ok(HttpResponse::Ok().json(ContentResponse::build(
        content,
        children,
        &user.username,
        state.api_base(),
    )))
}

/// PUT /api/content/me: scalar patch plus wholesale replacement of any
/// collection present in the body, applied atomically.
pub async fn update_my_content(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<UpdateContent>,
) -> AppResult<HttpResponse> {
    let (fields, mut collections) = body.into_inner().split();
    let fields = normalize_profile(fields)?;
    collections.portfolio = collections.portfolio.map(normalize_portfolio).transpose()?;

    let sections: Vec<&str> = [
        ("skills", collections.skills.is_some()),
        ("education", collections.education.is_some()),
        ("experience", collections.experience.is_some()),
        ("portfolio", collections.portfolio.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, present)| present.then_some(name))
    .collect();
    let section = if sections.is_empty() {
        "profile".to_string()
    } else {
        sections.join(",")
    };

    let (content, children) =
        content_db::update_content(&state.db, user.id, fields.clone(), collections).await?;
    history::record(
        &state.db,
        user.id,
        "content",
        &section,
        "update",
        None,
        snapshot(&fields),
    )
    .await;

    Ok(HttpResponse::Ok().json(ContentResponse::build(
        content,
        children,
        &user.username,
        state.api_base(),
    )))
}

/// GET /api/content/{username}: public page content.
pub async fn get_content(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let owner = user_by_username(&state, &path.into_inner()).await?;
    let content = content_db::get_or_create_content(&state.db, owner.id).await?;
    let children = content_db::load_children(&state.db, content.id).await?;
    Ok(HttpResponse::Ok().json(ContentResponse::build(
        content,
        children,
        &owner.username,
        state.api_base(),
    )))
}
