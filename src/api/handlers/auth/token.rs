//! Stateless session tokens (JWT, HS256).
//!
//! Claims are {sub, iat, exp}; nothing else rides in the token. Verification
//! runs with zero leeway so the configured lifetime is the lifetime.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(super) struct Claims {
    pub(super) sub: Uuid,
    pub(super) iat: i64,
    pub(super) exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(super) enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Mint a signed token for the given account.
///
/// # Errors
/// Fails only when the signing key is unusable (misconfiguration).
pub(super) fn issue(secret: &SecretString, user_id: Uuid, ttl_seconds: i64) -> anyhow::Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + ttl_seconds,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|err| anyhow::anyhow!("failed to sign session token: {err}"))
}

/// Verify signature and expiry, returning the embedded claims.
pub(super) fn verify(secret: &SecretString, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}
