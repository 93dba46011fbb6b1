//! Authentication and authorization gates.
//!
//! Flow Overview: extract the token from the request, verify it, re-resolve
//! the account, and reject anything issued before the account's token
//! horizon. The hard variant gates protected routes; the soft variant only
//! annotates and deliberately fails open on malformed tokens.

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use super::session::extract_session_token;
use super::state::AuthState;
use super::storage::{self, UserRecord};
use super::token::{self, TokenError};
use super::types::Role;
use crate::api::handlers::error::ApiError;

/// Authenticated account attached to the request after a gate pass.
#[derive(Clone, Debug)]
pub(crate) struct Principal {
    pub(crate) user: UserRecord,
}

/// Hard gate: reject unless a valid, non-stale session resolves to a live
/// account. Protected handlers call this first.
pub(crate) async fn require_auth(
    headers: &HeaderMap,
    pool: &PgPool,
    state: &AuthState,
) -> Result<Principal, ApiError> {
    let Some(raw) = extract_session_token(headers) else {
        return Err(ApiError::Unauthorized(
            "You are not logged in. Please log in to get access.".to_string(),
        ));
    };

    let claims =
        token::verify(state.config().signing_secret(), &raw).map_err(|err| match err {
            TokenError::Expired => ApiError::Unauthorized(
                "Your session has expired. Please log in again.".to_string(),
            ),
            TokenError::Invalid => {
                ApiError::Unauthorized("Invalid session token. Please log in again.".to_string())
            }
        })?;

    let Some(user) = storage::lookup_user(pool, claims.sub).await? else {
        return Err(ApiError::Unauthorized(
            "The user belonging to this session no longer exists.".to_string(),
        ));
    };

    if token_is_stale(claims.iat, user.token_horizon) {
        return Err(ApiError::Unauthorized(
            "Password was changed recently. Please log in again.".to_string(),
        ));
    }

    Ok(Principal { user })
}

/// Soft gate: resolve an identity when possible, otherwise proceed
/// anonymously. Absent, malformed, expired, and stale tokens all read the
/// same; even a directory error only downgrades to anonymous.
pub(crate) async fn current_user(
    headers: &HeaderMap,
    pool: &PgPool,
    state: &AuthState,
) -> Option<Principal> {
    let raw = extract_session_token(headers)?;
    let claims = token::verify(state.config().signing_secret(), &raw).ok()?;
    let user = match storage::lookup_user(pool, claims.sub).await {
        Ok(user) => user?,
        Err(err) => {
            debug!("soft auth lookup failed: {err:#}");
            return None;
        }
    };
    if token_is_stale(claims.iat, user.token_horizon) {
        return None;
    }
    Some(Principal { user })
}

/// A token is stale when it was issued before the account's horizon.
/// Comparison is at second precision, matching the token's `iat` claim.
fn token_is_stale(issued_at: i64, horizon: DateTime<Utc>) -> bool {
    issued_at < horizon.timestamp()
}

/// Authorization predicate over (role, allowed set); no router mechanics.
#[must_use]
pub(crate) fn role_permits(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}

/// Capability check gating a route by role membership.
///
/// Composition order is a contract: callers run this only on a principal
/// produced by [`require_auth`].
pub(crate) fn require_role(principal: &Principal, allowed: &[Role]) -> Result<(), ApiError> {
    if role_permits(principal.user.role, allowed) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You do not have permission to perform this action.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{require_role, role_permits, token_is_stale, Principal};
    use crate::api::handlers::auth::storage::UserRecord;
    use crate::api::handlers::auth::types::Role;
    use crate::api::handlers::error::ApiError;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn principal(role: Role) -> Principal {
        Principal {
            user: UserRecord {
                id: Uuid::nil(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                role,
                token_horizon: Utc::now(),
            },
        }
    }

    #[test]
    fn token_issued_before_horizon_is_stale() {
        let horizon = Utc::now();
        let before = (horizon - Duration::seconds(30)).timestamp();
        assert!(token_is_stale(before, horizon));
    }

    #[test]
    fn token_issued_after_horizon_is_fresh() {
        let horizon = Utc::now();
        let after = (horizon + Duration::seconds(30)).timestamp();
        assert!(!token_is_stale(after, horizon));
    }

    #[test]
    fn token_issued_in_same_second_is_fresh() {
        // Horizon sub-second precision truncates away; a token minted in the
        // same second as a password change stays valid.
        let horizon = Utc::now();
        assert!(!token_is_stale(horizon.timestamp(), horizon));
    }

    #[test]
    fn role_permits_checks_membership() {
        assert!(role_permits(Role::Admin, &[Role::Admin, Role::LeadGuide]));
        assert!(role_permits(Role::LeadGuide, &[Role::Admin, Role::LeadGuide]));
        assert!(!role_permits(Role::User, &[Role::Admin, Role::LeadGuide]));
        assert!(!role_permits(Role::Guide, &[Role::Admin]));
        assert!(!role_permits(Role::Admin, &[]));
    }

    #[test]
    fn require_role_admits_member() {
        assert!(require_role(&principal(Role::Admin), &[Role::Admin]).is_ok());
    }

    #[test]
    fn require_role_rejects_non_member_with_forbidden() {
        let err = require_role(&principal(Role::User), &[Role::Admin])
            .expect_err("user role must be rejected");
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
