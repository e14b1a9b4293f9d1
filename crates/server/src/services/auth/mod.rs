//! Authentication service.
//!
//! Implements the admin credential check: one configured email/password
//! pair, verified with argon2. This check does not itself establish the
//! session — the route layer writes the session record immediately after a
//! successful check, which is the second step of the two-step handshake.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use sugar_maple_core::Email;

use crate::config::ServerConfig;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Display name stamped onto the lazily created admin user row.
const ADMIN_DISPLAY_NAME: &str = "Admin";

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    config: &'a ServerConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, config: &'a ServerConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            config,
        }
    }

    /// Check submitted admin credentials.
    ///
    /// Both halves are always evaluated so a mismatch in either yields the
    /// same error with comparable timing; on success the admin user row is
    /// created if missing (idempotently) and returned.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccessDenied` if either half doesn't match — no
    /// user row is written in that case.
    /// Returns `AuthError::BadHashConfig` if the configured hash is invalid.
    pub async fn admin_sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email_ok = Email::parse(email.trim())
            .is_ok_and(|candidate| candidate.as_str() == self.config.admin_email.as_str());

        let password_ok =
            verify_password(password, self.config.admin_password_hash.expose_secret())?;

        if !(email_ok & password_ok) {
            return Err(AuthError::AccessDenied);
        }

        let user = self
            .users
            .ensure(&self.config.admin_email, ADMIN_DISPLAY_NAME)
            .await?;

        info!(user_id = %user.id, "Admin credential check passed");
        Ok(user)
    }
}

/// Verify a password against an argon2 PHC hash.
///
/// A mismatch is a normal `false`; only a malformed hash is an error.
///
/// # Errors
///
/// Returns `AuthError::BadHashConfig` if `hash` is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::BadHashConfig)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2id.
///
/// Used by `sm-cli admin hash-password` to produce the value for
/// `STORE_ADMIN_PASSWORD_HASH`.
///
/// # Errors
///
/// Returns `AuthError::BadHashConfig` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::BadHashConfig)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("maple-sap-runs-in-march").unwrap();
        assert!(verify_password("maple-sap-runs-in-march", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::BadHashConfig)
        ));
    }
}
