//! Ledgerline Gateway library.
//!
//! The gateway owns all interaction with the records database. It is
//! intentionally headless: no HTML, no routing, no presentation concerns.
//! The surrounding application layer calls in through four components:
//!
//! - [`db::ConnectionManager`] - one lazily-initialized pooled connection
//!   per process, with plain-then-TLS transport negotiation.
//! - [`services::auth::AuthService`] - credential verification returning
//!   hash-stripped identities.
//! - [`db::CustomerRepository`] / [`db::InvoiceRepository`] - typed,
//!   parameter-bound read operations.
//! - [`services::mutations::MutationService`] - schema-validated writes
//!   with cache-invalidation signalling.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod seed;
pub mod services;

use db::{ConnectionError, ConnectionManager, CustomerRepository, InvoiceRepository,
         UserRepository};
use services::auth::AuthService;

/// Top-level handle bundling the shared connection with the gateway's
/// read and auth components.
///
/// The pool is created on first use; every component obtained from the
/// same `Gateway` shares it.
pub struct Gateway {
    connections: ConnectionManager,
}

impl Gateway {
    /// Create a gateway from database configuration. No connection is
    /// opened until a component is first used.
    #[must_use]
    pub fn new(config: db::DatabaseConfig) -> Self {
        Self {
            connections: ConnectionManager::new(config),
        }
    }

    /// The shared pool handle, connecting on first call.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if both transport negotiations fail.
    pub async fn pool(&self) -> Result<&sqlx::PgPool, ConnectionError> {
        self.connections.get().await
    }

    /// Customer read operations.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the pool cannot be established.
    pub async fn customers(&self) -> Result<CustomerRepository<'_>, ConnectionError> {
        Ok(CustomerRepository::new(self.pool().await?))
    }

    /// Invoice read operations.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the pool cannot be established.
    pub async fn invoices(&self) -> Result<InvoiceRepository<'_>, ConnectionError> {
        Ok(InvoiceRepository::new(self.pool().await?))
    }

    /// User read operations.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the pool cannot be established.
    pub async fn users(&self) -> Result<UserRepository<'_>, ConnectionError> {
        Ok(UserRepository::new(self.pool().await?))
    }

    /// Credential verification.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the pool cannot be established.
    pub async fn auth(&self) -> Result<AuthService<'_>, ConnectionError> {
        Ok(AuthService::new(self.pool().await?))
    }
}
