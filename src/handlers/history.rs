use actix_web::{HttpResponse, web};

use crate::auth::middleware::AuthenticatedUser;
use crate::db::history as history_db;
use crate::error::AppResult;
use crate::models::edit_histories::{CreateEditHistory, HistoryQuery};
use crate::services::validation::Validate;
use crate::state::AppState;

/// GET /api/admin/edit-history?page=&limit=&section=
pub async fn list_history(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> AppResult<HttpResponse> {
    let page = history_db::list_for_user(&state.db, user.id, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/admin/edit-history: manual entry. Unlike internal recording,
/// failures here are reported.
pub async fn create_history(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<CreateEditHistory>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    input.validate()?;
    let entry = history_db::insert(&state.db, user.id, input).await?;
    Ok(HttpResponse::Created().json(entry))
}
