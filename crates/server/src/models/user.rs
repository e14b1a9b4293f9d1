//! User domain types.
//!
//! The store has exactly one meaningful user: the admin. The row is created
//! lazily on the first successful credential check and looked up by its
//! unique email thereafter.

use chrono::{DateTime, Utc};

use sugar_maple_core::{Email, UserId};

/// A backend user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Unique; used as the lookup key.
    pub email: Email,
    pub name: String,
    /// When the user's email was verified, if ever.
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
