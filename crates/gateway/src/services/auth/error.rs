//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// The variants are observably distinct for logging and audit, but any
/// external boundary must render them through [`AuthError::public_message`]
/// so that input-shape failures, unknown accounts, and wrong passwords are
/// indistinguishable to a caller probing for registered emails.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] ledgerline_core::EmailError),

    /// Password shorter than the minimum length.
    #[error("password too short")]
    PasswordTooShort,

    /// No user registered under the presented email.
    #[error("user not found")]
    UserNotFound,

    /// Presented secret does not match the stored hash.
    #[error("invalid credentials")]
    BadCredential,

    /// Sign-up attempted with an email that already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Sign-up name fails the shape check.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// The one message callers outside the trust boundary may see.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_)
            | Self::PasswordTooShort
            | Self::UserNotFound
            | Self::BadCredential => "Invalid credentials.",
            Self::UserAlreadyExists => "User with this email already exists.",
            Self::InvalidName(_) | Self::PasswordHash | Self::Repository(_) => {
                "Something went wrong."
            }
        }
    }
}
