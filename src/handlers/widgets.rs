use actix_web::{HttpResponse, web};
use uuid::Uuid;

use super::snapshot;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::widgets as widget_db;
use crate::error::{AppError, AppResult};
use crate::images::is_safe_key;
use crate::models::widgets::{CreateWidget, ReorderWidgets, WidgetPatch, WidgetResponse};
use crate::services::{history, layout};
use crate::state::AppState;
use crate::storage::{self, UploadCategory};

fn not_found() -> AppError {
    AppError::NotFound("ไม่พบวิดเจ็ต".to_string())
}

/// GET /api/widgets: the caller's widgets, hidden ones included.
pub async fn list_widgets(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let resolved = layout::resolve(&state.db, Some(user.id), true).await?;
    let widgets: Vec<WidgetResponse> = resolved
        .widgets
        .into_iter()
        .map(|w| WidgetResponse::build(w, state.api_base()))
        .collect();
    Ok(HttpResponse::Ok().json(widgets))
}

/// POST /api/widgets: append to the caller's current layout.
pub async fn create_widget(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<CreateWidget>,
) -> AppResult<HttpResponse> {
    let resolved = layout::resolve(&state.db, Some(user.id), true).await?;
    let widget = widget_db::create(&state.db, resolved.layout.id, body.into_inner()).await?;
    history::record(
        &state.db,
        user.id,
        "layout",
        "widget",
        "create",
        None,
        snapshot(&widget),
    )
    .await;

    Ok(HttpResponse::Created().json(WidgetResponse::build(widget, state.api_base())))
}

/// PUT /api/widgets/{id}
pub async fn update_widget(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<WidgetPatch>,
) -> AppResult<HttpResponse> {
    let patch = widget_db::normalize_patch(body.into_inner())?;
    let widget = widget_db::find_owned(&state.db, path.into_inner(), user.id)
        .await?
        .ok_or_else(not_found)?;
    let old_value = snapshot(&widget);

    let updated = widget_db::update(&state.db, widget, patch).await?;
    history::record(
        &state.db,
        user.id,
        "layout",
        "widget",
        "update",
        old_value,
        snapshot(&updated),
    )
    .await;

    Ok(HttpResponse::Ok().json(WidgetResponse::build(updated, state.api_base())))
}

/// DELETE /api/widgets/{id}
pub async fn delete_widget(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let widget = widget_db::find_owned(&state.db, path.into_inner(), user.id)
        .await?
        .ok_or_else(not_found)?;

    widget_db::delete(&state.db, widget.id).await?;

    // Only files this user uploaded for widgets are removed with the widget.
    let own_prefix = storage::upload_key_prefix(UploadCategory::Widget, user.id);
    if let Some(key) = widget
        .image_url
        .as_deref()
        .filter(|k| is_safe_key(k) && k.starts_with(&own_prefix))
    {
        storage::delete_quietly(state.storage.as_ref(), key).await;
    }

    history::record(
        &state.db,
        user.id,
        "layout",
        "widget",
        "delete",
        snapshot(&widget),
        None,
    )
    .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "ลบวิดเจ็ตเรียบร้อยแล้ว",
        "id": widget.id,
    })))
}

/// PUT /api/widgets/reorder: `{ items: [{ id, order }] }`.
pub async fn reorder_widgets(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<ReorderWidgets>,
) -> AppResult<HttpResponse> {
    let ReorderWidgets { items } = body.into_inner();
    let current = layout::resolve(&state.db, Some(user.id), true).await?;

    let moved = widget_db::reorder(&state.db, current.layout.id, &items).await?;
    if moved < items.len() as u64 {
        tracing::warn!(
            user_id = %user.id,
            requested = items.len(),
            moved,
            "reorder referenced widgets outside the current layout"
        );
    }

    let resolved = layout::resolve(&state.db, Some(user.id), true).await?;
    history::record(
        &state.db,
        user.id,
        "layout",
        "widget",
        "reorder",
        None,
        snapshot(&items),
    )
    .await;

    let widgets: Vec<WidgetResponse> = resolved
        .widgets
        .into_iter()
        .map(|w| WidgetResponse::build(w, state.api_base()))
        .collect();
    Ok(HttpResponse::Ok().json(widgets))
}
