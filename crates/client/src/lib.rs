//! NeoMarket Client - REST transport for the NeoMarket backend.
//!
//! This crate implements the gateway traits declared in `neomarket-core`
//! on top of a single reqwest-based [`ApiClient`].

mod client;
mod dashboard;
mod investments;
mod payments;
mod users;

pub use client::{ApiClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
