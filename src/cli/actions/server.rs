use crate::api::{
    self,
    email::LogEmailSender,
    handlers::auth::AuthConfig,
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub cookie_ttl_days: i64,
    pub reset_ttl_seconds: i64,
    pub secure_cookie: bool,
    pub cors_origin: Option<String>,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let auth_config = AuthConfig::new(args.jwt_secret)
        .with_token_ttl_seconds(args.token_ttl_seconds)
        .with_cookie_ttl_days(args.cookie_ttl_days)
        .with_reset_token_ttl_seconds(args.reset_ttl_seconds)
        .with_secure_cookie(args.secure_cookie);

    api::new(
        args.port,
        args.dsn,
        auth_config,
        Arc::new(LogEmailSender),
        args.cors_origin,
    )
    .await
}
