//! Mutation pipeline error types.
//!
//! Validation failures travel verbatim to the caller as a field → messages
//! map. Datastore failures are logged in full at the boundary and
//! re-expressed as the generic messages below; driver internals never
//! reach a caller.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Generic top-level message accompanying any validation failure.
pub const MISSING_FIELDS: &str = "Missing Fields.";

/// A mapping from field name to an ordered list of human-readable
/// violation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    /// Record a violation against a field. Messages keep insertion order.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    /// Violation messages for one field, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Whether any violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The field → messages map.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<&'static str, Vec<String>> {
        &self.errors
    }
}

/// Failure of a create or update operation.
#[derive(Debug, Error)]
pub enum MutationError {
    /// Per-field validation failures, surfaced verbatim. No datastore
    /// access occurred.
    #[error("{MISSING_FIELDS}")]
    Invalid(ValidationErrors),

    /// A datastore failure during execute, already logged with full
    /// detail. Only this generic category reaches the caller.
    #[error("Database Error.")]
    Database,
}

impl From<ValidationErrors> for MutationError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Failure of a delete operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperationError {
    /// The supplied id was empty.
    #[error("Invalid ID")]
    InvalidId,

    /// A batch delete was requested with an empty id set.
    #[error("No IDs provided")]
    NoIdsProvided,

    /// The datastore failed during the delete; detail is in the logs.
    #[error("Failed to delete {0}")]
    DeleteFailed(&'static str),
}

/// Failure of the external image storage collaborator.
#[derive(Debug, Error)]
#[error("image store error: {0}")]
pub struct ImageStoreError(pub String);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_insertion_order() {
        let mut errors = ValidationErrors::default();
        errors.add("amount", "first");
        errors.add("amount", "second");
        assert_eq!(
            errors.field("amount").unwrap(),
            ["first".to_owned(), "second".to_owned()]
        );
    }

    #[test]
    fn test_generic_messages_leak_no_detail() {
        assert_eq!(MutationError::Database.to_string(), "Database Error.");
        assert_eq!(
            OperationError::DeleteFailed("invoices").to_string(),
            "Failed to delete invoices"
        );
    }

    #[test]
    fn test_invalid_renders_top_level_message() {
        let mut errors = ValidationErrors::default();
        errors.add("customer_id", "Please select a customer.");
        assert_eq!(
            MutationError::Invalid(errors).to_string(),
            "Missing Fields."
        );
    }
}
