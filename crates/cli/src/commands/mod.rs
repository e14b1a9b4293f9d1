//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by database-touching commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the database URL from `STORE_DATABASE_URL` or `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, CommandError> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    std::env::var("STORE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("STORE_DATABASE_URL"))
}
