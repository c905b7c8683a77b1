/**
 * Server Configuration
 *
 * This module loads the process-wide configuration from environment
 * variables once at startup. The resulting `AppConfig` is immutable and
 * shared by reference (`Arc`) through `AppState`; nothing mutates it
 * afterwards, including the token signing key.
 */

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

/// Default cookie carrying the access token.
pub const DEFAULT_COOKIE_NAME: &str = "bonds_audiofile";

/// Configuration loading errors. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// Immutable process-wide configuration.
///
/// Constructed once in `main` and never mutated. The signing key is shared
/// by the access, refresh and session-reference tokens; there is no key
/// rotation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// HMAC-SHA256 signing key for all issued tokens.
    pub secret_key: String,
    /// Access token lifetime (default 30 minutes).
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (default 7 days).
    pub refresh_token_ttl: Duration,
    /// Name of the HTTP-only access-token cookie.
    pub cookie_name: String,
    /// Yandex OAuth application id.
    pub client_id: String,
    /// Yandex OAuth application secret.
    pub client_secret: String,
    /// Redirect URI registered with the identity provider.
    pub redirect_uri: String,
    /// Directory uploaded media files are written into.
    pub upload_dir: PathBuf,
    /// HTTP listen port.
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// `DATABASE_URL`, `SECRET_KEY`, `CLIENT_ID` and `CLIENT_SECRET` are
    /// required; everything else has a development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_minutes = parse_var("ACCESS_TOKEN_TTL_MINUTES", 30)?;
        let refresh_minutes = parse_var("REFRESH_TOKEN_TTL_MINUTES", 60 * 24 * 7)?;
        let port = parse_var("SERVER_PORT", 8000)?;

        Ok(Self {
            database_url: require_var("DATABASE_URL")?,
            secret_key: require_var("SECRET_KEY")?,
            access_token_ttl: Duration::minutes(access_minutes),
            refresh_token_ttl: Duration::minutes(refresh_minutes),
            cookie_name: std::env::var("COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_COOKIE_NAME.to_string()),
            client_id: require_var("CLIENT_ID")?,
            client_secret: require_var("CLIENT_SECRET")?,
            redirect_uri: std::env::var("REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8000/auth/yandex".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("upload")),
            port,
        })
    }

    /// Name of the HTTP-only session-reference cookie, derived from the
    /// access-cookie name.
    pub fn session_cookie_name(&self) -> String {
        format!("{}_session", self.cookie_name)
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Config with short, deterministic values for unit tests. No
    /// environment access.
    pub fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/test".to_string(),
            secret_key: "test-secret-key".to_string(),
            access_token_ttl: Duration::minutes(30),
            refresh_token_ttl: Duration::days(7),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost:8000/auth/yandex".to_string(),
            upload_dir: PathBuf::from("upload"),
            port: 8000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_name_is_derived_from_cookie_name() {
        let config = test_support::test_config();
        assert_eq!(config.session_cookie_name(), "bonds_audiofile_session");
    }

    #[test]
    fn missing_database_url_is_an_error() {
        // from_env requires DATABASE_URL; with a scrubbed name this maps to
        // MissingVar. Exercise the helper directly to avoid touching the
        // process environment.
        let err = require_var("AUDIOFILE_TEST_VAR_THAT_DOES_NOT_EXIST").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }
}
