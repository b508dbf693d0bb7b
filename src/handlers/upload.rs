use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures_util::TryStreamExt;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::content::{self as content_db, ImageTarget};
use crate::db::widgets as widget_db;
use crate::error::{AppError, AppResult};
use crate::images::{is_safe_key, proxy_url};
use crate::models::widgets::WidgetPatch;
use crate::services::history;
use crate::state::AppState;
use crate::storage::{self, UploadCategory};

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
const MAX_TEXT_FIELD: usize = 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub key: String,
    pub url: String,
}

/// Content type from the file's leading bytes. Only web image formats pass.
pub fn sniff_image(bytes: &[u8]) -> Option<(&'static str, &'static str)> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some(("image/jpeg", "jpg")),
        [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(("image/png", "png")),
        [0x47, 0x49, 0x46, 0x38, ..] => Some(("image/gif", "gif")),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => {
            Some(("image/webp", "webp"))
        }
        _ => None,
    }
}

#[derive(Default)]
struct UploadForm {
    file: Option<Vec<u8>>,
    target: Option<String>,
    portfolio_id: Option<String>,
    widget_id: Option<String>,
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(format!("ข้อมูล multipart ไม่ถูกต้อง: {e}"))
}

async fn read_limited(field: &mut Field, limit: usize, too_large: &str) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > limit {
            return Err(AppError::Validation(vec![too_large.to_string()]));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

async fn read_form(mut payload: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();
    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = read_limited(&mut field, MAX_FILE_SIZE, "ไฟล์ต้องมีขนาดไม่เกิน 5MB").await?;
                form.file = Some(bytes);
            }
            "target" | "portfolioId" | "widgetId" => {
                let raw = read_limited(&mut field, MAX_TEXT_FIELD, "ข้อมูลฟอร์มยาวเกินไป").await?;
                let value = String::from_utf8_lossy(&raw).trim().to_string();
                match name.as_str() {
                    "target" => form.target = Some(value),
                    "portfolioId" => form.portfolio_id = Some(value),
                    _ => form.widget_id = Some(value),
                }
            }
            // Drain fields we do not use.
            _ => {
                while field.try_next().await.map_err(multipart_error)?.is_some() {}
            }
        }
    }
    Ok(form)
}

fn parse_id(raw: Option<String>, label: &str) -> AppResult<Option<Uuid>> {
    match raw.filter(|s| !s.is_empty()) {
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(|_| AppError::Validation(vec![format!("{label} ไม่ถูกต้อง")])),
        None => Ok(None),
    }
}

/// POST /api/upload/{profile|portfolio|widget}
///
/// Stores the image under a fresh key and, when a target is named, points
/// that row at it and drops the object it replaced.
pub async fn upload_image(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let category = UploadCategory::parse(&path.into_inner())
        .ok_or_else(|| AppError::NotFound("ไม่รองรับประเภทการอัปโหลดนี้".to_string()))?;

    let form = read_form(payload).await?;
    let Some(bytes) = form.file.filter(|b| !b.is_empty()) else {
        return Err(AppError::Validation(vec!["กรุณาเลือกไฟล์".to_string()]));
    };
    let (content_type, extension) = sniff_image(&bytes).ok_or_else(|| {
        AppError::Validation(vec!["รองรับเฉพาะไฟล์ JPEG, PNG, GIF หรือ WebP".to_string()])
    })?;

    // Resolve the attach target before writing anything.
    let image_target = match category {
        UploadCategory::Profile => Some(
            ImageTarget::parse(form.target.as_deref().unwrap_or_default()).ok_or_else(|| {
                AppError::Validation(vec!["target ต้องเป็น profile หรือ about".to_string()])
            })?,
        ),
        _ => None,
    };
    let portfolio_id = parse_id(form.portfolio_id, "portfolioId")?;
    let widget_id = parse_id(form.widget_id, "widgetId")?;

    let key = storage::upload_key(category, user.id, extension);
    let size = bytes.len();
    state.storage.put(&key, bytes, content_type).await?;
    tracing::info!(user_id = %user.id, key, size, content_type, "stored upload");

    let attached = attach(
        &state,
        &user,
        category,
        image_target,
        portfolio_id,
        widget_id,
        &key,
    )
    .await;
    let replaced = match attached {
        Ok(replaced) => replaced,
        Err(e) => {
            storage::delete_quietly(state.storage.as_ref(), &key).await;
            return Err(e);
        }
    };
    if let Some(old) = replaced.filter(|old| is_safe_key(old) && *old != key) {
        storage::delete_quietly(state.storage.as_ref(), &old).await;
    }

    Ok(HttpResponse::Created().json(UploadResponse {
        url: proxy_url(state.api_base(), &key),
        key,
    }))
}

/// Point the target row at `key`. Returns the key it replaced, if any.
async fn attach(
    state: &AppState,
    user: &AuthenticatedUser,
    category: UploadCategory,
    image_target: Option<ImageTarget>,
    portfolio_id: Option<Uuid>,
    widget_id: Option<Uuid>,
    key: &str,
) -> AppResult<Option<String>> {
    let (section, replaced) = match category {
        UploadCategory::Profile => {
            let target = image_target.unwrap_or(ImageTarget::Profile);
            let (_, previous) =
                content_db::set_image(&state.db, user.id, target, Some(key.to_string())).await?;
            let section = match target {
                ImageTarget::Profile => "profileImage",
                ImageTarget::About => "aboutImage",
            };
            (section, previous)
        }
        UploadCategory::Portfolio => {
            let Some(item_id) = portfolio_id else {
                return Ok(None);
            };
            let content = content_db::get_or_create_content(&state.db, user.id).await?;
            let item = content_db::find_portfolio_item(&state.db, content.id, item_id)
                .await?
                .ok_or_else(|| AppError::NotFound("ไม่พบผลงาน".to_string()))?;
            let previous = item.image.clone();
            content_db::set_portfolio_image(&state.db, item, key.to_string()).await?;
            ("portfolio", previous)
        }
        UploadCategory::Widget => {
            let Some(widget_id) = widget_id else {
                return Ok(None);
            };
            let widget = widget_db::find_owned(&state.db, widget_id, user.id)
                .await?
                .ok_or_else(|| AppError::NotFound("ไม่พบวิดเจ็ต".to_string()))?;
            let previous = widget.image_url.clone();
            let patch = WidgetPatch {
                image_url: Some(key.to_string()),
                ..WidgetPatch::default()
            };
            widget_db::update(&state.db, widget, patch).await?;
            ("widget", previous)
        }
    };

    history::record(
        &state.db,
        user.id,
        "upload",
        section,
        "upload",
        replaced.clone().map(serde_json::Value::String),
        Some(serde_json::Value::String(key.to_string())),
    )
    .await;
    Ok(replaced)
}
