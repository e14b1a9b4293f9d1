//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Submitted credentials do not match the configured admin pair.
    ///
    /// Deliberately carries no detail about *which* half was wrong.
    #[error("access denied: invalid admin credentials")]
    AccessDenied,

    /// The configured admin password hash is not a valid PHC string.
    #[error("invalid admin password hash configuration")]
    BadHashConfig,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
