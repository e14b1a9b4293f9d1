//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STORE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STORE_BASE_URL` - Public URL for the store API (used to build media URLs)
//! - `STORE_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `STORE_ADMIN_EMAIL` - The single admin identity
//! - `STORE_ADMIN_PASSWORD_HASH` - Argon2 PHC hash of the admin password
//!   (generate with `sm-cli admin hash-password`)
//! - `STORE_MEDIA_SIGNING_SECRET` - HMAC key for signed upload URLs (min 32 chars)
//!
//! ## Optional
//! - `STORE_HOST` - Bind address (default: 127.0.0.1)
//! - `STORE_PORT` - Listen port (default: 3000)
//! - `STORE_MEDIA_DIR` - Directory for uploaded media (default: ./media)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use sugar_maple_core::Email;

const MIN_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Store server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the store API
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// The single configured admin identity
    pub admin_email: Email,
    /// Argon2 PHC hash of the admin password
    pub admin_password_hash: SecretString,
    /// Directory where uploaded media is stored
    pub media_dir: PathBuf,
    /// HMAC key for signing short-lived upload URLs
    pub media_signing_secret: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("session_secret", &"[REDACTED]")
            .field("admin_email", &self.admin_email)
            .field("admin_password_hash", &"[REDACTED]")
            .field("media_dir", &self.media_dir)
            .field("media_signing_secret", &"[REDACTED]")
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (length, placeholder detection).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STORE_DATABASE_URL")?;
        let host = get_env_or_default("STORE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("STORE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_PORT".to_string(), e.to_string()))?;

        let base_url = get_required_env("STORE_BASE_URL")?;
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_BASE_URL".to_string(), e.to_string()))?;

        let session_secret = get_validated_secret("STORE_SESSION_SECRET")?;
        let media_signing_secret = get_validated_secret("STORE_MEDIA_SIGNING_SECRET")?;

        let admin_email = Email::parse(&get_required_env("STORE_ADMIN_EMAIL")?).map_err(|e| {
            ConfigError::InvalidEnvVar("STORE_ADMIN_EMAIL".to_string(), e.to_string())
        })?;
        // The hash is a PHC string produced offline; it is secret material but
        // deliberately exempt from the placeholder blocklist ("$argon2id$..."
        // contains no recognizable words).
        let admin_password_hash = SecretString::from(get_required_env("STORE_ADMIN_PASSWORD_HASH")?);

        let media_dir = PathBuf::from(get_env_or_default("STORE_MEDIA_DIR", "./media"));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            admin_email,
            admin_password_hash,
            media_dir,
            media_signing_secret,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret is long enough and not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_SECRET_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("k9dJ3mW7xQ2pL5vT8bN1cR4hY6gF0sZa"),
            admin_email: Email::parse("admin@sugarmaple.shop").unwrap(),
            admin_password_hash: SecretString::from("$argon2id$v=19$m=19456,t=2,p=1$abc$def"),
            media_dir: PathBuf::from("./media"),
            media_signing_secret: SecretString::from("u2fP8wQ4rT6yH1jK3lM5nB7vC9xZ0aSd"),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", test_config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("postgres://localhost/test"));
        assert!(!debug.contains("argon2id"));
    }

    #[test]
    fn test_secret_strength_rejects_short() {
        let err = validate_secret_strength("short", "TEST_SECRET");
        assert!(matches!(err, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_secret_strength_rejects_placeholders() {
        let err = validate_secret_strength(
            "changeme-changeme-changeme-changeme",
            "TEST_SECRET",
        );
        assert!(matches!(err, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_secret_strength_accepts_random() {
        assert!(validate_secret_strength("k9dJ3mW7xQ2pL5vT8bN1cR4hY6gF0sZa", "TEST_SECRET").is_ok());
    }
}
