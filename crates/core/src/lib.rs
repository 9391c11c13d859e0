//! Ledgerline Core - Shared types library.
//!
//! This crate provides common types used across all Ledgerline components:
//! - `gateway` - Data gateway over the business-records database
//! - `cli` - Command-line tools for migrations, seeding, and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! connection handling. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, money, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
