//! Typed errors and their HTTP mapping.
//!
//! Every error body has the shape `{ statusCode, message, error }`, where
//! `message` is a single Thai sentence or, for validation failures, a list of them.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, ResponseError, error, web};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

pub const MSG_INTERNAL: &str = "เกิดข้อผิดพลาดภายในเซิร์ฟเวอร์";
pub const MSG_NOT_FOUND: &str = "ไม่พบข้อมูลที่ต้องการ";
pub const MSG_UNAUTHORIZED: &str = "กรุณาเข้าสู่ระบบ";
pub const MSG_TOO_MANY: &str = "มีการร้องขอมากเกินไป กรุณาลองใหม่ภายหลัง";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("rate limit exceeded, retry after {retry_after}s")]
    TooManyRequests { retry_after: u64 },
    #[error("database: {0}")]
    Database(#[from] DbErr),
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
    #[error("internal: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: serde_json::Value,
    pub error: &'static str,
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized(MSG_UNAUTHORIZED.to_string())
    }

    fn public_message(&self) -> serde_json::Value {
        match self {
            AppError::Validation(messages) => serde_json::json!(messages),
            AppError::TooManyRequests { .. } => serde_json::json!(MSG_TOO_MANY),
            AppError::Database(DbErr::RecordNotFound(_)) => serde_json::json!(MSG_NOT_FOUND),
            AppError::Storage(StorageError::NotFound(_)) => serde_json::json!("ไม่พบไฟล์ที่ต้องการ"),
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                serde_json::json!(MSG_INTERNAL)
            }
            other => serde_json::json!(other.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let mut builder = HttpResponse::build(status);
        if let AppError::TooManyRequests { retry_after } = self {
            builder.insert_header((header::RETRY_AFTER, retry_after.to_string()));
        }

        builder.json(ErrorBody {
            status_code: status.as_u16(),
            message: self.public_message(),
            error: status.canonical_reason().unwrap_or("Error"),
        })
    }
}

/// JSON extractor config: 1 MB bodies, malformed payloads become 400s with a Thai message.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
            tracing::debug!("rejected JSON body: {err}");
            AppError::BadRequest(format!("รูปแบบข้อมูล JSON ไม่ถูกต้อง: {err}")).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(format!("พารามิเตอร์ไม่ถูกต้อง: {err}")).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: error::PathError, _req: &HttpRequest| {
        AppError::BadRequest(format!("รูปแบบพาธไม่ถูกต้อง: {err}")).into()
    })
}
