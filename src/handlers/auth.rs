use actix_web::{HttpResponse, web};

use crate::auth::middleware::AuthenticatedUser;
use crate::auth::{jwt, password};
use crate::db::{self, users as user_db};
use crate::error::{AppError, AppResult};
use crate::models::users::{
    self, AuthResponse, LoginRequest, RegisterRequest, UpdateSessionPolicy, UserResponse,
};
use crate::services::validation::{Validate, normalize_username};
use crate::state::AppState;

const MSG_BAD_CREDENTIALS: &str = "ชื่อผู้ใช้หรือรหัสผ่านไม่ถูกต้อง";

fn auth_response(state: &AppState, user: users::Model) -> AppResult<AuthResponse> {
    let ttl = state.config.jwt_expires_in;
    let token = jwt::issue_token(
        user.id,
        &user.username,
        user.token_version,
        &state.config.jwt_secret,
        ttl,
    )
    .map_err(AppError::Internal)?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in: ttl.as_secs(),
        user: UserResponse::from(user),
    })
}

/// POST /api/auth/register: create an account and its empty page.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    input.validate()?;

    let username = normalize_username(&input.username);
    let email = input.email.trim().to_lowercase();
    if user_db::username_taken(&state.db, &username).await? {
        return Err(AppError::Conflict("ชื่อผู้ใช้นี้ถูกใช้งานแล้ว".to_string()));
    }
    if user_db::email_taken(&state.db, &email).await? {
        return Err(AppError::Conflict("อีเมลนี้ถูกใช้งานแล้ว".to_string()));
    }

    let plain = input.password;
    let password_hash = web::block(move || password::hash_password(&plain))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::Internal)?;

    let user = user_db::create_user_with_content(&state.db, username, email, password_hash)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                AppError::Conflict("ชื่อผู้ใช้หรืออีเมลนี้ถูกใช้งานแล้ว".to_string())
            } else {
                e.into()
            }
        })?;
    tracing::info!(user_id = %user.id, username = %user.username, "registered user");

    Ok(HttpResponse::Created().json(auth_response(&state, user)?))
}

/// POST /api/auth/login: accepts a username or an email.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let LoginRequest { username, password: plain } = body.into_inner();
    if username.trim().is_empty() || plain.is_empty() {
        return Err(AppError::Validation(vec![
            "กรุณากรอกชื่อผู้ใช้และรหัสผ่าน".to_string(),
        ]));
    }

    let Some(user) = user_db::find_by_login(&state.db, &username).await? else {
        web::block(move || password::verify_against_dummy(&plain))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        return Err(AppError::Unauthorized(MSG_BAD_CREDENTIALS.to_string()));
    };

    let hashed = user.password_hash.clone();
    let matches = web::block(move || password::verify_password(&plain, &hashed))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !matches {
        return Err(AppError::Unauthorized(MSG_BAD_CREDENTIALS.to_string()));
    }

    let user = if user.single_session {
        user_db::bump_token_version(&state.db, user).await?
    } else {
        user
    };

    Ok(HttpResponse::Ok().json(auth_response(&state, user)?))
}

/// GET /api/auth/me
pub async fn me(user: AuthenticatedUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let row = user_db::get_user_by_id(&state.db, user.id)
        .await?
        .ok_or_else(AppError::unauthorized)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(row)))
}

/// PUT /api/auth/session-policy: toggle "one active session at a time".
pub async fn update_session_policy(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<UpdateSessionPolicy>,
) -> AppResult<HttpResponse> {
    let updated =
        user_db::set_single_session(&state.db, user.id, body.into_inner().single_session).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
