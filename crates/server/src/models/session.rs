//! Session state types.

use serde::{Deserialize, Serialize};

use sugar_maple_core::{Email, UserId};

/// Keys used to store data in the session.
pub mod session_keys {
    /// The currently signed-in admin identity.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

/// The signed-in admin identity carried in the session.
///
/// Presence of this record is the entire authorization model: any resolved
/// identity is admin-capable (flat, binary authorization — not RBAC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub user_id: UserId,
    pub email: Email,
}
