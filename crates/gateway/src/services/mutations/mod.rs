//! The mutation pipeline: validate, transform, execute, signal.
//!
//! Each operation runs the raw input through schema validation (no
//! datastore access on failure), converts major-unit amounts to minor
//! units exactly once, executes a single atomic statement, and on success
//! emits a cache-invalidation signal keyed by the affected collection.
//!
//! Collaborators are injected through small traits so the pipeline never
//! depends on a presentation framework and is testable against mocks:
//! the row stores ([`CustomerStore`], [`InvoiceStore`]), the invalidation
//! sink ([`ChangeNotifier`]) and the external image storage
//! ([`ImageStore`]).
//!
//! Concurrency note: there is no optimistic-concurrency check; concurrent
//! updates to the same row are serialized only by the database's own
//! row-level locking, so last-writer-wins.

mod error;
mod validation;

pub use error::{ImageStoreError, MISSING_FIELDS, MutationError, OperationError, ValidationErrors};
pub use validation::{CustomerInput, InvoiceInput};

use chrono::{DateTime, Utc};
use tracing::{error, warn};

use ledgerline_core::{CustomerId, CustomerStatus, Email, InvoiceId, InvoiceStatus, Money};

use crate::db::RepositoryError;
use validation::{validate_customer, validate_invoice};

/// Collection key for customer listings.
pub const COLLECTION_CUSTOMERS: &str = "customers";

/// Collection key for invoice listings.
pub const COLLECTION_INVOICES: &str = "invoices";

/// A validated, transformed invoice ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    /// Referenced customer.
    pub customer_id: CustomerId,
    /// Amount in minor units.
    pub amount: Money,
    /// Payment status.
    pub status: InvoiceStatus,
    /// Issuance date.
    pub date: DateTime<Utc>,
}

/// A validated, transformed invoice update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceUpdate {
    /// Invoice to update.
    pub id: InvoiceId,
    /// Referenced customer.
    pub customer_id: CustomerId,
    /// Amount in minor units.
    pub amount: Money,
    /// Payment status.
    pub status: InvoiceStatus,
}

/// A validated, transformed customer update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerUpdate {
    /// Customer to update.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Account status.
    pub status: CustomerStatus,
    /// `Some(new reference)` to replace the stored image reference;
    /// `None` preserves whatever is already stored.
    pub image_url: Option<String>,
}

/// A new image accompanying a customer update.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

/// Outcome of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Number of rows removed.
    pub deleted: u64,
    /// Human-readable confirmation.
    pub message: String,
}

/// Row store for invoice mutations, implemented by the sqlx repository.
#[allow(async_fn_in_trait)]
pub trait InvoiceStore {
    /// Insert one invoice.
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), RepositoryError>;
    /// Update one invoice.
    async fn update(&self, update: &InvoiceUpdate) -> Result<(), RepositoryError>;
    /// Delete one invoice, returning the number of rows removed.
    async fn delete(&self, id: &InvoiceId) -> Result<u64, RepositoryError>;
    /// Delete every invoice in the id set in one atomic statement.
    async fn delete_many(&self, ids: &[InvoiceId]) -> Result<u64, RepositoryError>;
}

/// Row store for customer mutations, implemented by the sqlx repository.
#[allow(async_fn_in_trait)]
pub trait CustomerStore {
    /// Update one customer.
    async fn update(&self, update: &CustomerUpdate) -> Result<(), RepositoryError>;
    /// Delete one customer, returning the number of rows removed.
    async fn delete(&self, id: &CustomerId) -> Result<u64, RepositoryError>;
    /// Delete every customer in the id set in one atomic statement.
    async fn delete_many(&self, ids: &[CustomerId]) -> Result<u64, RepositoryError>;
}

/// Sink for "this named collection changed" signals. A local notification
/// contract consumed by the presentation layer, not a network call.
pub trait ChangeNotifier {
    /// Mark cached views of `collection` as stale.
    fn collection_changed(&self, collection: &str);
}

/// External storage collaborator for customer images.
#[allow(async_fn_in_trait)]
pub trait ImageStore {
    /// Persist a new image and return its stored reference.
    async fn store(&self, image: &ImagePayload) -> Result<String, ImageStoreError>;
    /// Remove a previously stored image. Callers treat failure as
    /// best-effort: it is logged, never surfaced.
    async fn remove(&self, reference: &str) -> Result<(), ImageStoreError>;
}

/// The write side of the gateway.
pub struct MutationService<C, I, N, S> {
    customers: C,
    invoices: I,
    notifier: N,
    images: S,
}

impl<C, I, N, S> MutationService<C, I, N, S>
where
    C: CustomerStore,
    I: InvoiceStore,
    N: ChangeNotifier,
    S: ImageStore,
{
    /// Assemble the pipeline from its collaborators.
    #[must_use]
    pub const fn new(customers: C, invoices: I, notifier: N, images: S) -> Self {
        Self {
            customers,
            invoices,
            notifier,
            images,
        }
    }

    /// Validate and insert a new invoice. The issuance date defaults to
    /// now when the input carries none.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Invalid` with the field → messages map if
    /// any rule fails (no datastore access occurs), or
    /// `MutationError::Database` if the insert fails.
    pub async fn create_invoice(&self, input: InvoiceInput) -> Result<(), MutationError> {
        let valid = validate_invoice(&input)?;

        let invoice = NewInvoice {
            customer_id: valid.customer_id,
            amount: valid.amount,
            status: valid.status,
            date: valid.date.unwrap_or_else(Utc::now),
        };

        self.invoices.insert(&invoice).await.map_err(|e| {
            error!(error = %e, "failed to create invoice");
            MutationError::Database
        })?;

        self.notifier.collection_changed(COLLECTION_INVOICES);
        Ok(())
    }

    /// Validate and apply an invoice update as one atomic statement.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Invalid` if any rule fails (no datastore
    /// access occurs), or `MutationError::Database` if the update fails.
    pub async fn update_invoice(
        &self,
        id: &InvoiceId,
        input: InvoiceInput,
    ) -> Result<(), MutationError> {
        let valid = validate_invoice(&input)?;

        let update = InvoiceUpdate {
            id: id.clone(),
            customer_id: valid.customer_id,
            amount: valid.amount,
            status: valid.status,
        };

        self.invoices.update(&update).await.map_err(|e| {
            error!(error = %e, invoice_id = %id, "failed to update invoice");
            MutationError::Database
        })?;

        self.notifier.collection_changed(COLLECTION_INVOICES);
        Ok(())
    }

    /// Delete one invoice.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidId` for an empty id, or
    /// `OperationError::DeleteFailed` if the statement fails.
    pub async fn delete_invoice(&self, id: &InvoiceId) -> Result<DeleteOutcome, OperationError> {
        if id.is_empty() {
            return Err(OperationError::InvalidId);
        }

        let deleted = self.invoices.delete(id).await.map_err(|e| {
            error!(error = %e, invoice_id = %id, "failed to delete invoice");
            OperationError::DeleteFailed("invoice")
        })?;

        self.notifier.collection_changed(COLLECTION_INVOICES);
        Ok(DeleteOutcome {
            deleted,
            message: "Invoice deleted successfully".to_owned(),
        })
    }

    /// Delete a set of invoices in one atomic statement: ids with no
    /// matching row simply don't count, they cannot fail the rest.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::NoIdsProvided` for an empty set (before
    /// any datastore access), or `OperationError::DeleteFailed` if the
    /// statement fails.
    pub async fn delete_invoices(
        &self,
        ids: &[InvoiceId],
    ) -> Result<DeleteOutcome, OperationError> {
        if ids.is_empty() {
            return Err(OperationError::NoIdsProvided);
        }

        let deleted = self.invoices.delete_many(ids).await.map_err(|e| {
            error!(error = %e, count = ids.len(), "failed to delete invoices");
            OperationError::DeleteFailed("invoices")
        })?;

        self.notifier.collection_changed(COLLECTION_INVOICES);
        Ok(DeleteOutcome {
            deleted,
            message: format!("{deleted} invoice(s) deleted successfully"),
        })
    }

    /// Validate and apply a customer update.
    ///
    /// If `image` carries a new payload it is persisted *before* the row
    /// update and the previous reference is scheduled for best-effort
    /// removal - a removal failure is logged and swallowed, never
    /// surfaced. With no new image the stored reference is preserved
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Invalid` if any rule fails (no datastore
    /// access occurs), or `MutationError::Database` if persisting the
    /// image or updating the row fails.
    pub async fn update_customer(
        &self,
        id: &CustomerId,
        input: CustomerInput,
        image: Option<ImagePayload>,
        existing_image_url: Option<&str>,
    ) -> Result<(), MutationError> {
        let valid = validate_customer(&input)?;

        let image_url = match image {
            Some(payload) => {
                let reference = self.images.store(&payload).await.map_err(|e| {
                    error!(error = %e, customer_id = %id, "failed to store customer image");
                    MutationError::Database
                })?;

                if let Some(previous) = existing_image_url
                    && !previous.is_empty()
                    && let Err(e) = self.images.remove(previous).await
                {
                    // Best effort only; the update must not fail here.
                    warn!(error = %e, reference = previous, "failed to remove previous image");
                }

                Some(reference)
            }
            None => None,
        };

        let update = CustomerUpdate {
            id: id.clone(),
            name: valid.name,
            email: valid.email,
            status: valid.status,
            image_url,
        };

        self.customers.update(&update).await.map_err(|e| {
            error!(error = %e, customer_id = %id, "failed to update customer");
            MutationError::Database
        })?;

        self.notifier.collection_changed(COLLECTION_CUSTOMERS);
        Ok(())
    }

    /// Delete one customer. The schema declares no delete cascade, so
    /// the database rejects this while invoices still reference the row.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidId` for an empty id, or
    /// `OperationError::DeleteFailed` if the statement fails.
    pub async fn delete_customer(&self, id: &CustomerId) -> Result<DeleteOutcome, OperationError> {
        if id.is_empty() {
            return Err(OperationError::InvalidId);
        }

        let deleted = self.customers.delete(id).await.map_err(|e| {
            error!(error = %e, customer_id = %id, "failed to delete customer");
            OperationError::DeleteFailed("customer")
        })?;

        self.notifier.collection_changed(COLLECTION_CUSTOMERS);
        Ok(DeleteOutcome {
            deleted,
            message: "Customer deleted successfully".to_owned(),
        })
    }

    /// Delete a set of customers in one atomic statement.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::NoIdsProvided` for an empty set (before
    /// any datastore access), or `OperationError::DeleteFailed` if the
    /// statement fails.
    pub async fn delete_customers(
        &self,
        ids: &[CustomerId],
    ) -> Result<DeleteOutcome, OperationError> {
        if ids.is_empty() {
            return Err(OperationError::NoIdsProvided);
        }

        let deleted = self.customers.delete_many(ids).await.map_err(|e| {
            error!(error = %e, count = ids.len(), "failed to delete customers");
            OperationError::DeleteFailed("customers")
        })?;

        self.notifier.collection_changed(COLLECTION_CUSTOMERS);
        Ok(DeleteOutcome {
            deleted,
            message: format!("{deleted} customer(s) deleted successfully"),
        })
    }
}
