//! Customer domain types.

use serde::Serialize;
use sqlx::FromRow;

use ledgerline_core::{CustomerId, CustomerStatus, Email, Money};

/// A customer record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Optional stored image reference.
    pub image_url: Option<String>,
    /// Account status.
    pub status: CustomerStatus,
}

/// Just enough of a customer to populate a selection list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerName {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
}

/// A customer joined with per-status invoice totals, as produced by the
/// filtered listing.
///
/// Zero-row aggregates are zero, never absent. Raw minor-unit values are
/// preserved; use [`Self::pending_display`] and [`Self::paid_display`]
/// only at the display boundary.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerWithTotals {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Optional stored image reference.
    pub image_url: Option<String>,
    /// Number of invoices for this customer.
    pub total_invoices: i64,
    /// Sum of pending invoice amounts, minor units.
    pub total_pending: Money,
    /// Sum of paid invoice amounts, minor units.
    pub total_paid: Money,
}

impl CustomerWithTotals {
    /// Pending total as a human-readable currency string.
    #[must_use]
    pub fn pending_display(&self) -> String {
        self.total_pending.display()
    }

    /// Paid total as a human-readable currency string.
    #[must_use]
    pub fn paid_display(&self) -> String {
        self.total_paid.display()
    }
}
