//! User repository for database operations.
//!
//! Only [`UserRepository::get_by_email`] ever selects the password hash,
//! and it stays inside the crate; every other read returns a `SafeUser`
//! with the hash column never selected at all.

use sqlx::PgPool;

use ledgerline_core::{Email, UserId};

use super::RepositoryError;
use crate::models::{SafeUser, User};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their exact email address, hash included.
    ///
    /// Crate-internal: the result must be reduced to a `SafeUser` before
    /// leaving the gateway.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub(crate) async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their ID, hash stripped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<SafeUser>, RepositoryError> {
        let user = sqlx::query_as::<_, SafeUser>(
            "SELECT id, name, email FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// All users, hash stripped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<SafeUser>, RepositoryError> {
        let users = sqlx::query_as::<_, SafeUser>("SELECT id, name, email FROM users")
            .fetch_all(self.pool)
            .await?;

        Ok(users)
    }

    /// Create a new user from an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<SafeUser, RepositoryError> {
        let user = sqlx::query_as::<_, SafeUser>(
            "INSERT INTO users (name, email, password) \
             VALUES ($1, $2, $3) \
             RETURNING id, name, email",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(user)
    }
}
