//! Password reset: request a token by email, then redeem it.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, instrument};

use super::credentials;
use super::session::authenticated_response;
use super::state::AuthState;
use super::storage;
use super::token;
use super::types::{
    ForgotPasswordRequest, ResetPasswordRequest, StatusResponse, UserResponse,
};
use super::utils::{
    generate_reset_token, hash_reset_token, normalize_email, valid_email, valid_new_password,
};
use crate::api::email::EmailMessage;
use crate::api::handlers::error::{ApiError, ErrorBody};

#[utoipa::path(
    post,
    path = "/forgotPassword",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset token sent to the account email", body = StatusResponse),
        (status = 400, description = "Missing or invalid email", body = ErrorBody),
        (status = 404, description = "No account for that email", body = ErrorBody),
        (status = 500, description = "Delivery failed; token rolled back", body = ErrorBody)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn forgot_password(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ForgotPasswordRequest>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    if !valid_email(&email) {
        return Err(ApiError::Validation(
            "Please provide a valid email address".to_string(),
        ));
    }

    let Some(user) = storage::lookup_user_by_email(&pool, &email).await? else {
        return Err(ApiError::NotFound(
            "There is no user with that email address".to_string(),
        ));
    };

    // The raw token goes out by email only; the database sees its hash.
    let raw_token = generate_reset_token()?;
    let token_hash = hash_reset_token(&raw_token);
    let config = auth_state.config();
    storage::set_reset_token(&pool, user.id, &token_hash, config.reset_token_ttl_seconds())
        .await?;

    let ttl_minutes = config.reset_token_ttl_seconds() / 60;
    let message = EmailMessage {
        to_email: user.email.clone(),
        subject: format!("Your password reset token (valid for {ttl_minutes} min)"),
        body: format!(
            "Forgot your password? Submit a PATCH request with your new password to \
             /resetPassword/{raw_token}.\nIf you didn't forget your password, ignore this email."
        ),
    };

    if let Err(err) = auth_state.mailer().send(&message).await {
        error!("failed to send password reset email: {err:#}");
        // An undelivered token must not stay redeemable.
        storage::clear_reset_token(&pool, user.id).await?;
        return Err(ApiError::Internal(anyhow::anyhow!(
            "password reset email delivery failed"
        )));
    }

    Ok(Json(StatusResponse {
        status: "success",
        message: Some("Token sent to email".to_string()),
    }))
}

#[utoipa::path(
    patch,
    path = "/resetPassword/{token}",
    request_body = ResetPasswordRequest,
    params(
        ("token" = String, Path, description = "Raw reset token from the email")
    ),
    responses(
        (status = 200, description = "Password replaced, fresh session token attached", body = super::types::AuthResponse),
        (status = 400, description = "Invalid or expired token, or bad password fields", body = ErrorBody)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn reset_password(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path(raw_token): Path<String>,
    payload: Option<Json<ResetPasswordRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

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

    let token_hash = hash_reset_token(raw_token.trim());
    let password_hash = credentials::hash_password(password)?;

    // Redeem and update in one atomic write; see storage::consume_reset_token.
    let Some(user) = storage::consume_reset_token(&pool, &token_hash, &password_hash).await?
    else {
        return Err(ApiError::Validation(
            "Token is invalid or has expired".to_string(),
        ));
    };

    let config = auth_state.config();
    let token = token::issue(config.signing_secret(), user.id, config.token_ttl_seconds())?;
    authenticated_response(config, StatusCode::OK, token, UserResponse::from(&user))
}
