//! User repository for database operations.
//!
//! The users table effectively holds one row: the admin, created lazily on
//! the first successful credential check and addressed by unique email.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sugar_maple_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::User;

/// Database row for a user.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    email_verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            name: row.name,
            email_verified_at: row.email_verified_at,
            created_at: row.created_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, name, email_verified_at, created_at \
             FROM store.users \
             WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Ensure a user row exists for `email`, creating it if absent.
    ///
    /// Idempotent: a concurrent or repeated call never creates a duplicate —
    /// the unique email key absorbs the race and the existing row is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn ensure(&self, email: &Email, name: &str) -> Result<User, RepositoryError> {
        sqlx::query(
            "INSERT INTO store.users (email, name, email_verified_at) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(email.as_str())
        .bind(name)
        .execute(self.pool)
        .await?;

        self.get_by_email(email)
            .await?
            .ok_or_else(|| RepositoryError::DataCorruption("user vanished after ensure".to_owned()))
    }
}
