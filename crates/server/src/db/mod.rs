//! Database operations for the store `PostgreSQL`.
//!
//! # Tables (schema `store`)
//!
//! - `products` - The catalog (indexed by category and featured flag)
//! - `orders` - Customer orders with snapshot totals (indexed by status and customer email)
//! - `contacts` - Contact messages (indexed by status)
//! - `users` - Backend users (the admin row, keyed by unique email)
//! - `tower_sessions.session` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p sugar-maple-cli -- migrate
//! ```
//!
//! All queries use the runtime-checked sqlx API with explicit row structs;
//! repositories convert rows into domain models and surface invalid stored
//! data (unknown status strings, malformed emails) as
//! [`RepositoryError::DataCorruption`].

pub mod contacts;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be interpreted (invalid status, bad email).
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced row does not exist.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
