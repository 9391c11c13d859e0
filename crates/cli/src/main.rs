//! Ledgerline CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ledgerline migrate
//!
//! # Seed demo data (runs pending migrations first)
//! ledgerline seed
//!
//! # Check database connectivity
//! ledgerline ping
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ledgerline")]
#[command(author, version, about = "Ledgerline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo data
    Seed {
        /// Number of demo users to generate
        #[arg(long, default_value_t = 10)]
        users: usize,
    },
    /// Check database connectivity
    Ping,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { users } => commands::seed::run(users).await?,
        Commands::Ping => commands::ping::run().await?,
    }
    Ok(())
}
