use axum::{extract::Extension, http::StatusCode, response::Response, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::credentials;
use super::session::authenticated_response;
use super::state::AuthState;
use super::storage::{self, SignupOutcome};
use super::token;
use super::types::{SignupRequest, UserResponse};
use super::utils::{normalize_email, valid_email, valid_new_password};
use crate::api::handlers::error::{ApiError, ErrorBody};

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, session token attached", body = super::types::AuthResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn signup(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignupRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::Validation("Please provide your name".to_string()))?;

    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    if !valid_email(&email) {
        return Err(ApiError::Validation(
            "Please provide a valid email address".to_string(),
        ));
    }

    let password = request
        .password
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Please provide a password".to_string()))?;
    if !valid_new_password(password) {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if request.password_confirm.as_deref() != Some(password) {
        return Err(ApiError::Validation("Passwords do not match".to_string()));
    }

    // Role is never read from the body; every signup starts as a plain user.
    let password_hash = credentials::hash_password(password)?;

    match storage::insert_user(&pool, name, &email, &password_hash).await? {
        SignupOutcome::Conflict => {
            debug!("signup conflict for existing email");
            Err(ApiError::Validation("Email already in use".to_string()))
        }
        SignupOutcome::Created(user) => {
            let config = auth_state.config();
            let token = token::issue(config.signing_secret(), user.id, config.token_ttl_seconds())?;
            authenticated_response(
                config,
                StatusCode::CREATED,
                token,
                UserResponse::from(&user),
            )
        }
    }
}
