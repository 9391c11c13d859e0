//! Database migration command.
//!
//! # Environment Variables
//!
//! - `GATEWAY_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection
//!   string

use tracing::info;

use ledgerline_gateway::config::GatewayConfig;
use ledgerline_gateway::{Gateway, db};

/// Run the gateway database migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the connection cannot be
/// established, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = GatewayConfig::from_env()?;
    let gateway = Gateway::new(config.database);

    info!("Connecting to database...");
    let pool = gateway.pool().await?;

    db::run_migrations(pool).await?;

    info!("Migrations complete!");
    Ok(())
}
