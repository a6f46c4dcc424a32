//! Bearer-key authentication for the dashboard read API.
//!
//! The webhook route stays outside this layer: the device authenticates by
//! its bound `uid`, not by API key. When no keys are configured the server
//! still starts, but every protected route answers 401 until
//! `MURMUR_API_KEYS` is set.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;

use super::response::{ApiResponse, ErrorCode};

pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let keys = &state.config.server.api_keys;
    if keys.is_empty() {
        return unauthorized("API keys not configured. Set MURMUR_API_KEYS to enable access.");
    }

    let verdict = match bearer_token(request.headers()) {
        Ok(token) if keys.iter().any(|k| k == token) => Ok(()),
        Ok(_) => Err("Invalid API key"),
        Err(message) => Err(message),
    };

    match verdict {
        Ok(()) => next.run(request).await,
        Err(message) => unauthorized(message),
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or("Missing authorization header")?;

    header
        .strip_prefix("Bearer ")
        .ok_or("Invalid authorization header format. Expected: Bearer <token>")
}

fn unauthorized(message: &str) -> Response {
    ApiResponse::<()>::error(ErrorCode::Unauthorized, message).into_response()
}
