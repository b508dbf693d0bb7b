use actix_web::http::header::{self, CacheControl, CacheDirective};
use actix_web::{HttpResponse, web};

use crate::error::{AppError, AppResult};
use crate::images::is_safe_key;
use crate::state::AppState;

/// GET /api/images/{key:.*}: stream a stored object without exposing the bucket.
pub async fn serve_image(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let key = path.into_inner();
    if !is_safe_key(&key) {
        return Err(AppError::NotFound("ไม่พบไฟล์ที่ต้องการ".to_string()));
    }

    let object = state.storage.get(&key).await?;
    let content_type = object
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(86_400),
        ]))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(object.bytes))
}
