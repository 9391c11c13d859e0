//! Business services for the gateway.
//!
//! - [`auth`] - Credential verification and sign-up
//! - [`mutations`] - The validate/transform/execute/signal write pipeline

pub mod auth;
pub mod mutations;
