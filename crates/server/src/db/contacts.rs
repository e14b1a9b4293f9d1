//! Contact message repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sugar_maple_core::{ContactId, ContactStatus};

use super::RepositoryError;
use crate::models::contact::{Contact, NewContact};

/// Database row for a contact message.
#[derive(sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let status: ContactStatus = row.status.parse().map_err(|e: String| {
            RepositoryError::DataCorruption(format!("invalid contact status in database: {e}"))
        })?;

        Ok(Self {
            id: ContactId::new(row.id),
            name: row.name,
            email: row.email,
            message: row.message,
            status,
            created_at: row.created_at,
        })
    }
}

/// Repository for contact message database operations.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new contact message with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewContact) -> Result<Contact, RepositoryError> {
        let row: ContactRow = sqlx::query_as(
            "INSERT INTO store.contacts (name, email, message, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, message, status, created_at",
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.message)
        .bind(ContactStatus::New.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// All contact messages, by-status index order walked descending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn list(&self) -> Result<Vec<Contact>, RepositoryError> {
        let rows: Vec<ContactRow> = sqlx::query_as(
            "SELECT id, name, email, message, status, created_at \
             FROM store.contacts \
             ORDER BY status DESC, created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Contact::try_from).collect()
    }

    /// Overwrite a contact's status. Transitions are not validated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the contact doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE store.contacts SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
