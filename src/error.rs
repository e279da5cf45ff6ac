//! Error types shared across the crate.

use std::net::SocketAddr;

/// Errors raised by a [`HashRing`](crate::hashring::HashRing).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// A lookup was attempted on a ring with no nodes.
    #[error("hash ring is empty")]
    EmptyRing,

    /// The node to remove is not registered.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The node is already registered.
    #[error("node already registered: {0}")]
    DuplicateNode(String),
}

/// Errors raised by a [`ShardStore`](crate::storage::memory::ShardStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("key {0} not found")]
    NotFound(i64),
}

/// Errors raised while routing or dispatching a request from the client.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// No owner could be computed for the key.
    #[error(transparent)]
    Ring(#[from] RingError),

    /// The request never produced a response (connect failure, timeout, ...).
    #[error("request to {node} failed: {source}")]
    Network {
        node: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON.
    #[error("invalid response from {node}: {source}")]
    Decode {
        node: String,
        #[source]
        source: reqwest::Error,
    },

    /// The shard answered with a status the client does not accept.
    #[error("{node} answered with unexpected status {status}")]
    UnexpectedStatus {
        node: String,
        status: reqwest::StatusCode,
    },
}

/// Errors raised while starting shard servers.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while parsing command-line configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid port range '{0}', expected START-END")]
    PortRange(String),

    #[error("port range {start}-{end} is empty")]
    EmptyPortRange { start: u16, end: u16 },

    #[error("invalid assignment '{0}', expected KEY->VALUE")]
    Assignment(String),
}
