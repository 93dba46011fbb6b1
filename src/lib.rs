//! # Ekskurso (Tour Booking API)
//!
//! `ekskurso` is the authentication and account authority for the tour
//! booking platform. It owns signup, login, logout, password reset, and the
//! middleware gates that the resource routers (tours, bookings, reviews)
//! compose in front of their handlers.
//!
//! ## Sessions
//!
//! Sessions are stateless: a signed, time-limited token (JWT, HS256) is
//! issued at login/signup and carried either in an `Authorization: Bearer`
//! header or in the `jwt` cookie. The server keeps no session table and no
//! revocation list; a token dies when it expires or when the account's
//! **token horizon** moves past its issuance time, which happens on every
//! password change.
//!
//! ## Password Reset
//!
//! Reset tokens are single-use, short-lived random values delivered by
//! email. Only a SHA-256 hash and an expiry are persisted; consuming a token
//! and applying the new password happen in one atomic row update, so a
//! failed update never burns the token and a successful one always clears it.
//!
//! ## Roles
//!
//! Accounts carry one of `user`, `guide`, `lead-guide`, `admin`. Restricted
//! routes check membership after authentication; the check is a plain
//! predicate over (role, allowed set), independent of router mechanics.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
