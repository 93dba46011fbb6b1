//! Administrative account listing.
//!
//! The route exists for operators; it is the canonical composition of the
//! two gates: authenticate first, then check role membership.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::ToSchema;

use super::auth::guard::{require_auth, require_role};
use super::auth::storage;
use super::auth::types::{Role, UserResponse};
use super::auth::AuthState;
use super::error::{ApiError, ErrorBody};

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersEnvelope {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub status: &'static str,
    pub results: usize,
    pub data: UsersEnvelope,
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All accounts", body = UsersResponse),
        (status = 401, description = "Not logged in", body = ErrorBody),
        (status = 403, description = "Role not permitted", body = ErrorBody)
    ),
    tag = "account"
)]
pub async fn list_users(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<(StatusCode, Json<UsersResponse>), ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;
    require_role(&principal, &[Role::Admin, Role::LeadGuide])?;

    let users = storage::list_users(&pool).await?;
    let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    Ok((
        StatusCode::OK,
        Json(UsersResponse {
            status: "success",
            results: users.len(),
            data: UsersEnvelope { users },
        }),
    ))
}
