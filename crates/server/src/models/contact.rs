//! Contact message domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sugar_maple_core::{ContactId, ContactStatus};

/// A customer contact message.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    /// Stored verbatim; the store does not validate contact email format.
    pub email: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for submitting a contact message. New messages always start with
/// status `new`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}
