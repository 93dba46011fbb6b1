//! Session carriage: the `jwt` cookie, bearer extraction, and logout.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;

use super::guard::current_user;
use super::state::{AuthConfig, AuthState};
use super::types::{AuthResponse, StatusResponse, UserEnvelope, UserResponse};
use crate::api::handlers::error::ApiError;

pub(crate) const SESSION_COOKIE_NAME: &str = "jwt";
// Overwriting the cookie with a short-lived sentinel is the whole logout
// mechanism; the server holds no session state to delete.
const LOGOUT_SENTINEL: &str = "loggedout";
const LOGOUT_MAX_AGE_SECONDS: i64 = 10;

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = StatusResponse)
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(auth_state.config()) {
        headers.insert(SET_COOKIE, cookie);
    }
    (
        StatusCode::OK,
        headers,
        Json(StatusResponse {
            status: "success",
            message: None,
        }),
    )
}

/// Soft check: report the current account when a valid session rides along,
/// 204 otherwise. Never rejects, so pages can render for anonymous visitors.
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Session is active", body = UserEnvelope),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    match current_user(&headers, &pool, &auth_state).await {
        Some(principal) => (
            StatusCode::OK,
            Json(UserEnvelope {
                user: UserResponse::from(&principal.user),
            }),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Build a secure `HttpOnly` cookie carrying the session token.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = config.cookie_ttl_days() * 24 * 60 * 60;
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
    );
    if config.secure_cookie() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={LOGOUT_SENTINEL}; Path=/; HttpOnly; SameSite=Lax; Max-Age={LOGOUT_MAX_AGE_SECONDS}"
    );
    if config.secure_cookie() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Token extraction order is part of the contract: `Authorization: Bearer`
/// wins, the cookie is the fallback.
pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Success response that both sets the cookie and returns the token in the
/// body, used by signup, login, and the password-change flows.
pub(super) fn authenticated_response(
    config: &AuthConfig,
    status: StatusCode,
    token: String,
    user: UserResponse,
) -> Result<Response, ApiError> {
    let cookie = session_cookie(config, &token)
        .map_err(|err| anyhow::anyhow!("failed to build session cookie: {err}"))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    let body = AuthResponse {
        status: "success",
        token,
        data: UserEnvelope { user },
    };
    Ok((status, headers, Json(body)).into_response())
}
