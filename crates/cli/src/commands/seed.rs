//! Demo data seeding command.
//!
//! Runs pending migrations first, then inserts the demo dataset inside
//! one transaction. Safe to re-run: existing rows are left untouched.

use tracing::info;

use ledgerline_gateway::config::GatewayConfig;
use ledgerline_gateway::{Gateway, db, seed};

/// Seed the database with demo users, customers and invoices.
///
/// # Errors
///
/// Returns an error if configuration is missing, the connection cannot be
/// established, or any seed statement fails (the transaction rolls back).
pub async fn run(users: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = GatewayConfig::from_env()?;
    let gateway = Gateway::new(config.database);

    info!("Connecting to database...");
    let pool = gateway.pool().await?;

    db::run_migrations(pool).await?;

    let summary = seed::run(pool, users).await?;

    info!("Seeding complete!");
    info!("  Users inserted: {}", summary.users);
    info!("  Customers inserted: {}", summary.customers);
    info!("  Invoices inserted: {}", summary.invoices);
    Ok(())
}
