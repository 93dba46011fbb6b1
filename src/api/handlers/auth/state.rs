//! Auth configuration and shared state.

use crate::api::email::EmailSender;
use secrecy::SecretString;
use std::sync::Arc;

const DEFAULT_TOKEN_TTL_SECONDS: i64 = 90 * 24 * 60 * 60;
const DEFAULT_COOKIE_TTL_DAYS: i64 = 90;
const DEFAULT_RESET_TOKEN_TTL_SECONDS: i64 = 10 * 60;

/// Explicit configuration threaded into each component at construction.
/// Components never read the environment themselves.
#[derive(Clone)]
pub struct AuthConfig {
    signing_secret: SecretString,
    token_ttl_seconds: i64,
    cookie_ttl_days: i64,
    reset_token_ttl_seconds: i64,
    secure_cookie: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(signing_secret: SecretString) -> Self {
        Self {
            signing_secret,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            cookie_ttl_days: DEFAULT_COOKIE_TTL_DAYS,
            reset_token_ttl_seconds: DEFAULT_RESET_TOKEN_TTL_SECONDS,
            secure_cookie: false,
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_ttl_days(mut self, days: i64) -> Self {
        self.cookie_ttl_days = days;
        self
    }

    #[must_use]
    pub fn with_reset_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.reset_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    pub(crate) fn signing_secret(&self) -> &SecretString {
        &self.signing_secret
    }

    pub(crate) fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    pub(crate) fn cookie_ttl_days(&self) -> i64 {
        self.cookie_ttl_days
    }

    pub(crate) fn reset_token_ttl_seconds(&self) -> i64 {
        self.reset_token_ttl_seconds
    }

    pub(crate) fn secure_cookie(&self) -> bool {
        self.secure_cookie
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret", &"***")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("cookie_ttl_days", &self.cookie_ttl_days)
            .field("reset_token_ttl_seconds", &self.reset_token_ttl_seconds)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

pub struct AuthState {
    config: AuthConfig,
    mailer: Arc<dyn EmailSender>,
}

impl AuthState {
    pub fn new(config: AuthConfig, mailer: Arc<dyn EmailSender>) -> Self {
        Self { config, mailer }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn mailer(&self) -> &dyn EmailSender {
        self.mailer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthConfig, AuthState};
    use crate::api::email::LogEmailSender;
    use std::sync::Arc;

    fn secret() -> secrecy::SecretString {
        secrecy::SecretString::from("test-secret".to_string())
    }

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new(secret());

        assert_eq!(config.token_ttl_seconds(), super::DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(config.cookie_ttl_days(), super::DEFAULT_COOKIE_TTL_DAYS);
        assert_eq!(
            config.reset_token_ttl_seconds(),
            super::DEFAULT_RESET_TOKEN_TTL_SECONDS
        );
        assert!(!config.secure_cookie());

        let config = config
            .with_token_ttl_seconds(3600)
            .with_cookie_ttl_days(1)
            .with_reset_token_ttl_seconds(120)
            .with_secure_cookie(true);

        assert_eq!(config.token_ttl_seconds(), 3600);
        assert_eq!(config.cookie_ttl_days(), 1);
        assert_eq!(config.reset_token_ttl_seconds(), 120);
        assert!(config.secure_cookie());
    }

    #[test]
    fn debug_masks_signing_secret() {
        let config = AuthConfig::new(secret());
        let rendered = format!("{config:?}");
        assert!(rendered.contains("***"));
        assert!(!rendered.contains("test-secret"));
    }

    #[test]
    fn auth_state_exposes_config() {
        let state = AuthState::new(
            AuthConfig::new(secret()).with_cookie_ttl_days(7),
            Arc::new(LogEmailSender),
        );
        assert_eq!(state.config().cookie_ttl_days(), 7);
    }
}
