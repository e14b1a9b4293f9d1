//! Contact service: message intake and admin triage.

use sqlx::PgPool;
use tracing::{info, instrument};

use sugar_maple_core::{ContactId, ContactStatus};

use crate::db::RepositoryError;
use crate::db::contacts::ContactRepository;
use crate::error::{AppError, Result};
use crate::models::contact::{Contact, NewContact};
use crate::models::session::CurrentAdmin;

/// Contact service.
pub struct ContactService<'a> {
    contacts: ContactRepository<'a>,
}

impl<'a> ContactService<'a> {
    /// Create a new contact service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            contacts: ContactRepository::new(pool),
        }
    }

    /// Submit a contact message. Customer-facing; no identity required.
    /// New messages always start with status `new`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[instrument(skip(self, input))]
    pub async fn submit(&self, input: &NewContact) -> Result<Contact> {
        let contact = self.contacts.create(input).await?;
        info!(contact_id = %contact.id, "Contact message received");
        Ok(contact)
    }

    /// All contact messages. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self, admin), fields(admin = %admin.email))]
    pub async fn list(&self, admin: &CurrentAdmin) -> Result<Vec<Contact>> {
        Ok(self.contacts.list().await?)
    }

    /// Overwrite a contact's status. Admin-only; transitions unvalidated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the contact doesn't exist.
    #[instrument(skip(self, admin), fields(admin = %admin.email))]
    pub async fn update_status(
        &self,
        admin: &CurrentAdmin,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<()> {
        self.contacts
            .update_status(id, status)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AppError::NotFound("contact not found".to_string()),
                other => other.into(),
            })?;

        info!(contact_id = %id, status = %status, admin = %admin.email, "Contact status updated");
        Ok(())
    }
}
