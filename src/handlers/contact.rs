use actix_web::{HttpResponse, web};
use uuid::Uuid;

use super::user_by_username;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::contact as contact_db;
use crate::error::{AppError, AppResult};
use crate::models::contact_messages::{ContactQuery, CreateContactMessage};
use crate::services::history;
use crate::services::validation::Validate;
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("ไม่พบข้อความ".to_string())
}

/// POST /api/contact: public contact form addressed to a page owner.
pub async fn submit_message(
    state: web::Data<AppState>,
    body: web::Json<CreateContactMessage>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    let Some(username) = input.username.clone().filter(|u| !u.trim().is_empty()) else {
        return Err(AppError::Validation(vec!["กรุณาระบุผู้รับข้อความ".to_string()]));
    };
    input.validate()?;

    let recipient = user_by_username(&state, &username).await?;
    let message = contact_db::insert_message(&state.db, recipient.id, input).await?;
    tracing::info!(recipient_id = %recipient.id, message_id = %message.id, "contact message received");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "ส่งข้อความเรียบร้อยแล้ว",
        "id": message.id,
    })))
}

/// GET /api/contact?unreadOnly=: the caller's inbox, newest first.
pub async fn list_messages(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    query: web::Query<ContactQuery>,
) -> AppResult<HttpResponse> {
    let unread_only = query.unread_only.unwrap_or(false);
    let messages = contact_db::list_for_recipient(&state.db, user.id, unread_only).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// PUT /api/contact/{id}/read
pub async fn mark_read(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let message = contact_db::find_for_recipient(&state.db, path.into_inner(), user.id)
        .await?
        .ok_or_else(not_found)?;
    let updated = contact_db::mark_read(&state.db, message).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/contact/{id}
pub async fn delete_message(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let message = contact_db::find_for_recipient(&state.db, path.into_inner(), user.id)
        .await?
        .ok_or_else(not_found)?;

    contact_db::delete_message(&state.db, message.id).await?;
    history::record(
        &state.db,
        user.id,
        "contact",
        "message",
        "delete",
        super::snapshot(&message),
        None,
    )
    .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "ลบข้อความเรียบร้อยแล้ว",
        "id": message.id,
    })))
}
