//! Invoice repository: reads, pagination, dashboard aggregates, and the
//! mutation pipeline's invoice store.

use sqlx::PgPool;

use ledgerline_core::{InvoiceId, Money};

use super::RepositoryError;
use crate::models::{DashboardTotals, InvoiceForm, InvoiceWithCustomer, LatestInvoice};
use crate::services::mutations::{InvoiceStore, InvoiceUpdate, NewInvoice};

/// Fixed page size for the filtered invoice listing.
pub const PAGE_SIZE: i64 = 6;

/// Number of invoices shown on the dashboard.
const LATEST_LIMIT: i64 = 5;

const FILTER_PREDICATE: &str = "customers.name ILIKE $1 \
     OR customers.email ILIKE $1 \
     OR invoices.amount::text ILIKE $1 \
     OR invoices.date::text ILIKE $1 \
     OR invoices.status ILIKE $1";

/// Derive the number of pages from a matching-row count.
///
/// Ceiling division by [`PAGE_SIZE`]; zero rows is zero pages.
#[must_use]
pub const fn page_count(total_rows: i64) -> i64 {
    // `i64::div_ceil` is unstable; this is equivalent for a positive divisor.
    total_rows.div_euclid(PAGE_SIZE) + (total_rows.rem_euclid(PAGE_SIZE) != 0) as i64
}

/// Repository for invoice database operations.
pub struct InvoiceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InvoiceRepository<'a> {
    /// Create a new invoice repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an invoice by ID, shaped for the edit form (amount re-expressed
    /// in major units here, exactly once). A miss is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: &InvoiceId) -> Result<Option<InvoiceForm>, RepositoryError> {
        let row: Option<(InvoiceId, ledgerline_core::CustomerId, Money, ledgerline_core::InvoiceStatus)> =
            sqlx::query_as(
                "SELECT id, customer_id, amount, status FROM invoices WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|(id, customer_id, amount, status)| InvoiceForm {
            id,
            customer_id,
            amount: amount.to_major(),
            status,
        }))
    }

    /// All invoices joined with customer details, ordered by insertion
    /// time descending. The ordering is part of the contract.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<InvoiceWithCustomer>, RepositoryError> {
        let invoices = sqlx::query_as::<_, InvoiceWithCustomer>(
            "SELECT \
               invoices.id, \
               invoices.amount, \
               invoices.date, \
               invoices.status, \
               invoices.created_at, \
               customers.name AS customer_name, \
               customers.email AS customer_email, \
               customers.image_url \
             FROM invoices \
             JOIN customers ON invoices.customer_id = customers.id \
             ORDER BY invoices.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(invoices)
    }

    /// One page of invoices matching a case-insensitive substring search
    /// across customer name, customer email, and the textual renderings of
    /// amount, date and status (OR semantics). Pages are 1-based.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_filtered(
        &self,
        query: &str,
        page: i64,
    ) -> Result<Vec<InvoiceWithCustomer>, RepositoryError> {
        let pattern = format!("%{query}%");
        let offset = (page.max(1) - 1) * PAGE_SIZE;

        let invoices = sqlx::query_as::<_, InvoiceWithCustomer>(&format!(
            "SELECT \
               invoices.id, \
               invoices.amount, \
               invoices.date, \
               invoices.status, \
               invoices.created_at, \
               customers.name AS customer_name, \
               customers.email AS customer_email, \
               customers.image_url \
             FROM invoices \
             JOIN customers ON invoices.customer_id = customers.id \
             WHERE {FILTER_PREDICATE} \
             ORDER BY invoices.date DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(invoices)
    }

    /// Number of invoices matching the search term.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_filtered(&self, query: &str) -> Result<i64, RepositoryError> {
        let pattern = format!("%{query}%");
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) \
             FROM invoices \
             JOIN customers ON invoices.customer_id = customers.id \
             WHERE {FILTER_PREDICATE}"
        ))
        .bind(&pattern)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Number of pages the filtered listing spans.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn pages(&self, query: &str) -> Result<i64, RepositoryError> {
        Ok(page_count(self.count_filtered(query).await?))
    }

    /// The most recent invoices by issuance date, for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(&self) -> Result<Vec<LatestInvoice>, RepositoryError> {
        let invoices = sqlx::query_as::<_, LatestInvoice>(
            "SELECT \
               invoices.id, \
               invoices.amount, \
               customers.name AS customer_name, \
               customers.email AS customer_email, \
               customers.image_url \
             FROM invoices \
             JOIN customers ON invoices.customer_id = customers.id \
             ORDER BY invoices.date DESC \
             LIMIT $1",
        )
        .bind(LATEST_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(invoices)
    }

    /// Entity counts and per-status amount sums for the dashboard cards.
    /// Empty tables aggregate to zero, never NULL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn dashboard_totals(&self) -> Result<DashboardTotals, RepositoryError> {
        let totals = sqlx::query_as::<_, DashboardTotals>(
            "SELECT \
               (SELECT COUNT(*) FROM invoices) AS invoice_count, \
               (SELECT COUNT(*) FROM customers) AS customer_count, \
               COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0)::bigint AS total_paid, \
               COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::bigint AS total_pending \
             FROM invoices",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(totals)
    }
}

impl InvoiceStore for InvoiceRepository<'_> {
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO invoices (customer_id, amount, status, date) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(invoice.date)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Single-statement update. Zero matched rows is a silent success,
    /// same as [`Self::delete`] reporting zero deletions.
    async fn update(&self, update: &InvoiceUpdate) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE invoices SET customer_id = $2, amount = $3, status = $4 WHERE id = $1",
        )
        .bind(&update.id)
        .bind(&update.customer_id)
        .bind(update.amount)
        .bind(update.status)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &InvoiceId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// One statement deleting every row whose id is in the set. Atomic:
    /// nonexistent ids simply don't match, they cannot fail the rest.
    async fn delete_many(&self, ids: &[InvoiceId]) -> Result<u64, RepositoryError> {
        let raw: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        let result = sqlx::query("DELETE FROM invoices WHERE id = ANY($1)")
            .bind(&raw)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_ceiling_division() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(6), 1);
        assert_eq!(page_count(7), 2);
        assert_eq!(page_count(12), 2);
        assert_eq!(page_count(13), 3);
    }
}
