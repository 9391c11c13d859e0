//! Domain models for the records gateway.
//!
//! Row-shaped structs derive `sqlx::FromRow` and map 1-to-1 onto query
//! results; display formatting of monetary amounts happens only through
//! the `Money` accessors at the read boundary.

pub mod customer;
pub mod invoice;
pub mod user;

pub use customer::{Customer, CustomerName, CustomerWithTotals};
pub use invoice::{DashboardTotals, InvoiceForm, InvoiceWithCustomer, LatestInvoice};
pub use user::{SafeUser, User};
