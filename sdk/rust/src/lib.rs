//! HTTP client for the entry relay.

pub mod client;

pub use client::RelayClient;
