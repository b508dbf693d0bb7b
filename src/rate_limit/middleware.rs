use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{Error, ResponseError, web};

use super::Decision;
use crate::auth::{jwt, middleware::bearer_token};
use crate::error::AppError;
use crate::state::AppState;

/// Fixed-window limiter for every `/api` request. Mount with `middleware::from_fn`.
pub async fn rate_limit<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    };
    if !state.limiter.config().enabled {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    }

    let ip = client_ip(&req, state.limiter.config().trust_proxy);
    // A signature check is enough to pick the bucket; no database hit here.
    let authenticated = bearer_token(&req)
        .map(|token| jwt::validate_token(&token, &state.config.jwt_secret).is_ok())
        .unwrap_or(false);

    let decision = state.limiter.check(&ip, authenticated).await;

    if !decision.allowed {
        tracing::warn!(ip, authenticated, "rate limit exceeded");
        let mut response = AppError::TooManyRequests {
            retry_after: decision.retry_after_secs(),
        }
        .error_response();
        apply_headers(response.headers_mut(), &decision);
        return Ok(req.into_response(response).map_into_right_body());
    }

    let mut res = next.call(req).await?;
    apply_headers(res.headers_mut(), &decision);
    Ok(res.map_into_left_body())
}

/// The socket peer, unless a trusted proxy supplies the client address.
fn client_ip(req: &ServiceRequest, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = req.connection_info().realip_remote_addr() {
            return ip.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn apply_headers(headers: &mut actix_web::http::header::HeaderMap, decision: &Decision) {
    headers.insert(
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-reset"),
        HeaderValue::from(decision.retry_after_secs()),
    );
}
