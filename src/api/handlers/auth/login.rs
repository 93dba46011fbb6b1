use axum::{extract::Extension, http::StatusCode, response::Response, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::credentials;
use super::session::authenticated_response;
use super::state::AuthState;
use super::storage;
use super::token;
use super::types::{LoginRequest, UserResponse};
use super::utils::normalize_email;
use crate::api::handlers::error::{ApiError, ErrorBody};

// One message for unknown email and wrong password; the split must not be
// observable from outside.
const BAD_CREDENTIALS: &str = "Incorrect email or password";

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session token attached", body = super::types::AuthResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Unknown email or wrong password", body = ErrorBody)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(ApiError::Validation(
            "Please provide email and password".to_string(),
        ));
    };

    let email = normalize_email(&email);

    let Some(creds) = storage::lookup_credentials(&pool, &email).await? else {
        debug!("login attempt for unknown email");
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    if !credentials::verify_password(&password, &creds.password_hash) {
        debug!("login attempt with wrong password");
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let Some(user) = storage::lookup_user(&pool, creds.id).await? else {
        // Account deleted between the two reads; indistinguishable on purpose.
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    let config = auth_state.config();
    let token = token::issue(config.signing_secret(), user.id, config.token_ttl_seconds())?;
    authenticated_response(config, StatusCode::OK, token, UserResponse::from(&user))
}
