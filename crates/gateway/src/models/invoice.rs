//! Invoice domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use ledgerline_core::{CustomerId, Email, InvoiceId, InvoiceStatus, Money};

/// An invoice joined with its customer, as produced by the listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceWithCustomer {
    /// Unique invoice ID.
    pub id: InvoiceId,
    /// Amount in minor units.
    pub amount: Money,
    /// Issuance date.
    pub date: DateTime<Utc>,
    /// Payment status.
    pub status: InvoiceStatus,
    /// Insertion timestamp (default ordering key for the full listing).
    pub created_at: DateTime<Utc>,
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: Email,
    /// Customer image reference, if any.
    pub image_url: Option<String>,
}

impl InvoiceWithCustomer {
    /// Amount as a human-readable currency string, for display only.
    #[must_use]
    pub fn amount_display(&self) -> String {
        self.amount.display()
    }
}

/// An invoice shaped for the edit form: the amount is re-expressed in
/// major units exactly once, here, and never re-divided downstream.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceForm {
    /// Unique invoice ID.
    pub id: InvoiceId,
    /// Referenced customer.
    pub customer_id: CustomerId,
    /// Amount in major units (dollars), scale 2.
    pub amount: Decimal,
    /// Payment status.
    pub status: InvoiceStatus,
}

/// A recent invoice for the dashboard, joined with customer details.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LatestInvoice {
    /// Unique invoice ID.
    pub id: InvoiceId,
    /// Amount in minor units.
    pub amount: Money,
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: Email,
    /// Customer image reference, if any.
    pub image_url: Option<String>,
}

impl LatestInvoice {
    /// Amount as a human-readable currency string, for display only.
    #[must_use]
    pub fn amount_display(&self) -> String {
        self.amount.display()
    }
}

/// Aggregate dashboard totals. Zero-row aggregates come back as zero.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DashboardTotals {
    /// Total number of invoices.
    pub invoice_count: i64,
    /// Total number of customers.
    pub customer_count: i64,
    /// Sum of paid invoice amounts, minor units.
    pub total_paid: Money,
    /// Sum of pending invoice amounts, minor units.
    pub total_pending: Money,
}

impl DashboardTotals {
    /// Paid total as a human-readable currency string.
    #[must_use]
    pub fn paid_display(&self) -> String {
        self.total_paid.display()
    }

    /// Pending total as a human-readable currency string.
    #[must_use]
    pub fn pending_display(&self) -> String {
        self.total_pending.display()
    }
}
