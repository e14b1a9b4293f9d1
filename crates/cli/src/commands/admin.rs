//! Admin setup helpers.

use sugar_maple_server::services::auth;

/// Hash a password with argon2 and print the PHC string.
///
/// The output is the value for `STORE_ADMIN_PASSWORD_HASH`.
///
/// # Errors
///
/// Returns an error if hashing fails.
#[allow(clippy::print_stdout)]
pub fn hash_password(password: &str) -> Result<(), auth::AuthError> {
    let hash = auth::hash_password(password)?;
    println!("{hash}");
    Ok(())
}
