//! Shared HTTP client construction policy for catalog clients.
//!
//! Centralizes timeout, user-agent, and compression defaults so every catalog
//! backend talks to the network the same way.

use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

use super::CatalogError;

/// Default connect timeout for catalog requests.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default whole-request timeout for catalog requests.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Timeouts applied to catalog HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Seconds allowed to establish a connection.
    pub connect_secs: u64,
    /// Seconds allowed for a full request/response exchange.
    pub read_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

/// Builds a catalog HTTP client using shared project policy.
///
/// # Errors
///
/// Returns [`CatalogError::Setup`] when client construction fails.
pub fn build_catalog_http_client(timeouts: HttpTimeouts) -> Result<Client, CatalogError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.read_secs))
        .user_agent(user_agent::default_catalog_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| {
            CatalogError::setup(
                &format!("HTTP client construction failed: {error}"),
                "Check proxy environment variables and TLS configuration",
            )
        })
}
