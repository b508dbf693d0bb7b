use actix_web::http::header::Header;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use crate::auth::jwt;
use crate::db::users as user_db;
use crate::error::AppError;
use crate::state::AppState;

/// The caller behind a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

/// Like [`AuthenticatedUser`] but never rejects: a missing or invalid token
/// yields `None` so the handler can serve the public view instead.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

/// The raw token from `Authorization: Bearer <token>`, if present and well-formed.
pub fn bearer_token<T: HttpMessage>(msg: &T) -> Option<String> {
    Authorization::<Bearer>::parse(msg)
        .ok()
        .map(|auth| auth.into_scheme().token().to_string())
}

async fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    // 1. Extract the Bearer token from the Authorization header.
    let token = bearer_token(req).ok_or_else(AppError::unauthorized)?;

    // 2. Get shared state from app data.
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".to_string()))?;

    // 3. Validate the signature and expiry.
    let claims = jwt::validate_token(&token, &state.config.jwt_secret).map_err(|e| {
        tracing::debug!("rejected bearer token: {e}");
        AppError::Unauthorized("โทเคนไม่ถูกต้องหรือหมดอายุ".to_string())
    })?;
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Unauthorized("โทเคนไม่ถูกต้องหรือหมดอายุ".to_string()))?;

    // 4. The account must still exist, and single-session users must hold the latest token.
    let user = user_db::get_user_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("ไม่พบบัญชีผู้ใช้".to_string()))?;
    if user.single_session && claims.ver != user.token_version {
        return Err(AppError::Unauthorized(
            "เซสชันนี้ถูกยกเลิกเนื่องจากมีการเข้าสู่ระบบจากที่อื่น".to_string(),
        ));
    }

    Ok(AuthenticatedUser {
        id: user.id,
        username: user.username,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(&req).await })
    }
}

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            if bearer_token(&req).is_none() {
                return Ok(OptionalUser(None));
            }
            match authenticate(&req).await {
                Ok(user) => Ok(OptionalUser(Some(user))),
                Err(AppError::Unauthorized(_)) => Ok(OptionalUser(None)),
                Err(e) => Err(e),
            }
        })
    }
}
