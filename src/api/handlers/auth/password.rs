//! Password change for an already-authenticated account.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::credentials;
use super::guard::require_auth;
use super::session::authenticated_response;
use super::state::AuthState;
use super::storage;
use super::token;
use super::types::{UpdatePasswordRequest, UserResponse};
use super::utils::valid_new_password;
use crate::api::handlers::error::{ApiError, ErrorBody};

#[utoipa::path(
    patch,
    path = "/updateMyPassword",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password replaced, fresh session token attached", body = super::types::AuthResponse),
        (status = 400, description = "Bad password fields", body = ErrorBody),
        (status = 401, description = "Not logged in or wrong current password", body = ErrorBody)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn update_password(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<UpdatePasswordRequest>>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;

    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let current = request
        .password_current
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Please provide your current password".to_string()))?;

    let password = request
        .password
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Please provide a new password".to_string()))?;
    if !valid_new_password(password) {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if request.password_confirm.as_deref() != Some(password) {
        return Err(ApiError::Validation("Passwords do not match".to_string()));
    }

    // Re-check the current password even though the session is valid; a
    // stolen cookie alone must not be enough to take over the account.
    let Some(creds) = storage::lookup_credentials(&pool, &principal.user.email).await? else {
        return Err(ApiError::Unauthorized(
            "The user belonging to this session no longer exists.".to_string(),
        ));
    };
    if !credentials::verify_password(current, &creds.password_hash) {
        debug!("password update with wrong current password");
        return Err(ApiError::Unauthorized(
            "Your current password is wrong".to_string(),
        ));
    }

    let password_hash = credentials::hash_password(password)?;
    let Some(user) = storage::update_password(&pool, principal.user.id, &password_hash).await?
    else {
        return Err(ApiError::Unauthorized(
            "The user belonging to this session no longer exists.".to_string(),
        ));
    };

    // The horizon moved, so the old token is dead; hand back a fresh one.
    let config = auth_state.config();
    let token = token::issue(config.signing_secret(), user.id, config.token_ttl_seconds())?;
    authenticated_response(config, StatusCode::OK, token, UserResponse::from(&user))
}
