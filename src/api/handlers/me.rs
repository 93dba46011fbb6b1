//! Authenticated self-service endpoints.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::ToSchema;

use super::auth::guard::require_auth;
use super::auth::types::{UserEnvelope, UserResponse};
use super::auth::AuthState;
use super::error::{ApiError, ErrorBody};

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub status: &'static str,
    pub data: UserEnvelope,
}

#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Return the authenticated account", body = MeResponse),
        (status = 401, description = "Missing, invalid, expired, or stale session token", body = ErrorBody)
    ),
    tag = "account"
)]
pub async fn get_me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<(StatusCode, Json<MeResponse>), ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;

    Ok((
        StatusCode::OK,
        Json(MeResponse {
            status: "success",
            data: UserEnvelope {
                user: UserResponse::from(&principal.user),
            },
        }),
    ))
}
