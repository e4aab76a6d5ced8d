//! NeoMarket Core - domain models, client state and the cycle workflow.
//!
//! This crate holds everything the admin console needs except the wire
//! transport. Gateways are traits implemented by the `neomarket-client`
//! crate, so the lifecycle controller can be exercised against mocks.

pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod investments;
pub mod notifications;
pub mod payments;
pub mod session;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
