//! User identity types.
//!
//! The password hash never leaves the credential-verification boundary:
//! [`User`] carries it crate-privately and is not serializable; every
//! externally visible representation is a [`SafeUser`].

use serde::Serialize;
use sqlx::FromRow;

use ledgerline_core::{Email, UserId};

/// A full user row, including the password hash.
///
/// Deliberately not `Serialize`: convert to [`SafeUser`] before anything
/// leaves the gateway. Implements `Debug` manually to redact the hash.
#[derive(Clone, FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address (case-sensitive identity key).
    pub email: Email,
    /// Argon2 password hash. Crate-private.
    #[sqlx(rename = "password")]
    pub(crate) password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// A user with the password hash stripped - the only representation that
/// crosses the trust boundary.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SafeUser {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_user_serialization_has_no_hash_field() {
        let user = User {
            id: UserId::generate(),
            name: "Amy".to_owned(),
            email: Email::parse("amy@x.com").unwrap(),
            password_hash: "$argon2id$v=19$...".to_owned(),
        };

        let safe = SafeUser::from(user);
        let json = serde_json::to_value(&safe).unwrap();
        let fields: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(fields.len(), 3);
        assert!(!json.to_string().contains("argon2"));
    }
}
