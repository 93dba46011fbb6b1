//! Command-line argument dispatch and server initialization.
//!
//! This module maps validated CLI arguments to the appropriate action, such
//! as starting the API server with its full configuration state.

use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let jwt_secret = matches
        .get_one::<String>("jwt-secret")
        .cloned()
        .context("missing required argument: --jwt-secret")?;
    let environment = matches
        .get_one::<String>("environment")
        .cloned()
        .unwrap_or_else(|| "development".to_string());

    Ok(Action::Server(Args {
        port,
        dsn,
        jwt_secret: SecretString::from(jwt_secret),
        token_ttl_seconds: matches
            .get_one::<i64>("token-ttl-seconds")
            .copied()
            .unwrap_or(7_776_000),
        cookie_ttl_days: matches
            .get_one::<i64>("cookie-ttl-days")
            .copied()
            .unwrap_or(90),
        reset_ttl_seconds: matches
            .get_one::<i64>("reset-ttl-seconds")
            .copied()
            .unwrap_or(600),
        secure_cookie: environment == "production",
        cors_origin: matches.get_one::<String>("cors-origin").cloned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn server_args_from_flags() {
        temp_env::with_vars(
            [
                ("EKSKURSO_DSN", None::<&str>),
                ("EKSKURSO_JWT_SECRET", None),
                ("EKSKURSO_ENVIRONMENT", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "ekskurso",
                    "--dsn",
                    "postgres://localhost/ekskurso",
                    "--jwt-secret",
                    "secret",
                    "--environment",
                    "production",
                    "--cors-origin",
                    "https://app.ekskurso.dev",
                ]);
                let action = handler(&matches).expect("handler should succeed");
                let Action::Server(args) = action;
                assert_eq!(args.port, 8080);
                assert_eq!(args.dsn, "postgres://localhost/ekskurso");
                assert_eq!(args.jwt_secret.expose_secret(), "secret");
                assert_eq!(args.token_ttl_seconds, 7_776_000);
                assert_eq!(args.cookie_ttl_days, 90);
                assert_eq!(args.reset_ttl_seconds, 600);
                assert!(args.secure_cookie);
                assert_eq!(
                    args.cors_origin.as_deref(),
                    Some("https://app.ekskurso.dev")
                );
            },
        );
    }

    #[test]
    fn development_environment_keeps_cookie_insecure() {
        temp_env::with_vars([("EKSKURSO_ENVIRONMENT", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec![
                "ekskurso",
                "--dsn",
                "postgres://localhost/ekskurso",
                "--jwt-secret",
                "secret",
            ]);
            let Action::Server(args) = handler(&matches).expect("handler should succeed");
            assert!(!args.secure_cookie);
            assert!(args.cors_origin.is_none());
        });
    }
}
