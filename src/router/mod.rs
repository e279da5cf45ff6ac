//! Client Router Module
//!
//! The client half of the store. Partitioning is entirely client-driven: the router
//! hashes each key onto its ring, picks the owning shard server and sends the write
//! there directly.
//!
//! ## Behavior
//! - **Routing**: Pure and deterministic. The same key over the same node set always
//!   yields the same node.
//! - **Dispatch**: One `PUT {node}/{key}/{value}` per pair, each bounded by
//!   `RouterConfig::request_timeout` so a stalled shard cannot hold up a batch.
//! - **Failures**: Network errors are returned per pair. A batch keeps going after a
//!   failed pair and reports every outcome.
//!
//! ## Submodules
//! - **`client`**: The `Router` itself and node identifier normalization.

pub mod client;

#[cfg(test)]
mod tests;

use crate::error::RouteError;
use crate::hashring::Strategy;
use std::time::Duration;

pub use client::Router;

/// Host used for node identifiers given as a bare `:port`.
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub strategy: Strategy,
    /// Upper bound for each request, connect included.
    pub request_timeout: Duration,
    pub default_host: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_host: DEFAULT_HOST.to_string(),
        }
    }
}

/// Outcome of one pair of a batch.
#[derive(Debug)]
pub struct DispatchReport {
    pub key: String,
    pub value: String,
    /// The node that stored the pair, or why it was not stored.
    pub outcome: Result<String, RouteError>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn node(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }
}
