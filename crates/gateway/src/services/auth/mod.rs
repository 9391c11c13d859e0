//! Credential verification service.
//!
//! Verification is stateless per invocation: shape-check the input,
//! look the user up by exact email, verify the presented secret against
//! the stored argon2 hash, and return a hash-stripped identity. Shape
//! failures never touch the datastore.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::warn;

use ledgerline_core::Email;

use crate::db::{RepositoryError, UserRepository};
use crate::models::SafeUser;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display-name length for sign-up.
const MIN_NAME_LENGTH: usize = 3;

/// Credential verification and sign-up.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Verify an email/password pair and return the safe identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::PasswordTooShort`
    /// if the input fails the shape check (no datastore access occurs).
    /// Returns `AuthError::UserNotFound` if no account matches the email.
    /// Returns `AuthError::BadCredential` if the password does not match.
    /// All three must be collapsed via [`AuthError::public_message`] at
    /// any external boundary.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<SafeUser, AuthError> {
        // Shape check before any datastore access
        let email = Email::parse(email)?;
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort);
        }

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, "authentication failed: user not found");
                AuthError::UserNotFound
            })?;

        verify_password(password, &user.password_hash).inspect_err(|_| {
            warn!(email = %email, "authentication failed: bad credential");
        })?;

        Ok(SafeUser::from(user))
    }

    /// Register a new user with name, email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidName`, `AuthError::InvalidEmail` or
    /// `AuthError::PasswordTooShort` if the input fails the shape check.
    /// Returns `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SafeUser, AuthError> {
        if name.trim().len() < MIN_NAME_LENGTH {
            return Err(AuthError::InvalidName(format!(
                "name must be at least {MIN_NAME_LENGTH} characters"
            )));
        }
        let email = Email::parse(email)?;
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name.trim(), &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }
}

/// Hash a password using Argon2id with a fresh random salt.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash (salted, constant-time).
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::BadCredential)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::BadCredential)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("123456").unwrap();
        assert!(verify_password("123456", &hash).is_ok());
        assert!(matches!(
            verify_password("654321", &hash),
            Err(AuthError::BadCredential)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("123456").unwrap();
        let second = hash_password("123456").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_garbage_hash_is_a_bad_credential() {
        assert!(matches!(
            verify_password("123456", "not-a-phc-string"),
            Err(AuthError::BadCredential)
        ));
    }
}
