//! CLI subcommand implementations.

pub mod migrate;
pub mod ping;
pub mod seed;
