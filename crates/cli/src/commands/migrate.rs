//! Database migration command.
//!
//! Runs the store schema migrations embedded from
//! `crates/server/migrations/`, then the session store's own migration
//! (which creates the `tower_sessions` schema).
//!
//! # Environment Variables
//!
//! - `STORE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions_sqlx_store::PostgresStore;

use super::CommandError;

/// Run all database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running store migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
