//! Customer repository: reads plus the mutation pipeline's customer store.
//!
//! Every query binds its parameters; caller-supplied query terms are
//! wrapped in `%…%` and passed as a single bound argument to ILIKE.

use sqlx::PgPool;

use ledgerline_core::CustomerId;

use super::RepositoryError;
use crate::models::{Customer, CustomerName, CustomerWithTotals};
use crate::services::mutations::{CustomerStore, CustomerUpdate};

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by ID. A miss is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, image_url, status FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// All customers, ordered by name ascending. The ordering is part of
    /// the contract: the presentation layer relies on it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, image_url, status FROM customers ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Customer IDs and names for selection lists, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_names(&self) -> Result<Vec<CustomerName>, RepositoryError> {
        let names = sqlx::query_as::<_, CustomerName>(
            "SELECT id, name FROM customers ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }

    /// Case-insensitive substring search over name and email, joined with
    /// per-status invoice totals. Customers without invoices aggregate to
    /// zero, not NULL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_filtered(
        &self,
        query: &str,
    ) -> Result<Vec<CustomerWithTotals>, RepositoryError> {
        let pattern = format!("%{query}%");
        let customers = sqlx::query_as::<_, CustomerWithTotals>(
            "SELECT \
               customers.id, \
               customers.name, \
               customers.email, \
               customers.image_url, \
               COUNT(invoices.id) AS total_invoices, \
               COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::bigint AS total_pending, \
               COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::bigint AS total_paid \
             FROM customers \
             LEFT JOIN invoices ON customers.id = invoices.customer_id \
             WHERE customers.name ILIKE $1 OR customers.email ILIKE $1 \
             GROUP BY customers.id, customers.name, customers.email, customers.image_url \
             ORDER BY customers.name ASC",
        )
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Total number of customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

impl CustomerStore for CustomerRepository<'_> {
    /// Single-statement update. A missing image reference preserves the
    /// stored one (COALESCE) rather than nulling it. Zero matched rows is
    /// a silent success, same as [`Self::delete`] reporting zero
    /// deletions.
    async fn update(&self, update: &CustomerUpdate) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE customers \
             SET name = $2, email = $3, status = $4, image_url = COALESCE($5, image_url) \
             WHERE id = $1",
        )
        .bind(&update.id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(update.status)
        .bind(update.image_url.as_deref())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// One statement deleting every row whose id is in the set. Atomic:
    /// nonexistent ids simply don't match, they cannot fail the rest.
    async fn delete_many(&self, ids: &[CustomerId]) -> Result<u64, RepositoryError> {
        let raw: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        let result = sqlx::query("DELETE FROM customers WHERE id = ANY($1)")
            .bind(&raw)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
