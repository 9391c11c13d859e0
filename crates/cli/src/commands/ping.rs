//! Database connectivity check.

use ledgerline_gateway::config::GatewayConfig;
use ledgerline_gateway::{Gateway, db};

/// One round trip to the database, printing the server clock.
///
/// # Errors
///
/// Returns an error if configuration is missing or the round trip fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = GatewayConfig::from_env()?;
    let gateway = Gateway::new(config.database);

    let pool = gateway.pool().await?;
    let now = db::ping(pool).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("database reachable, server time: {now}");
    }
    Ok(())
}
