//! Shard Storage Module
//!
//! The server side of the store: one in-memory map per listening port, served over HTTP.
//!
//! ## Core Concepts
//! - **Shard**: A `ShardStore` owned by exactly one `ShardServer`. Shards never exchange
//!   data; which shard holds a key is decided entirely by the client's hash ring.
//! - **Concurrency**: Handlers for one port run in parallel and share the store, which
//!   serializes access internally.
//! - **Cluster**: `Cluster` starts N servers on N ports inside one process. Scaling out
//!   means starting more servers and adding their addresses to the clients' node set.
//!
//! ## Submodules
//! - **`memory`**: The thread-safe in-memory map.
//! - **`protocol`**: Route shapes and JSON DTOs.
//! - **`handlers`**: Axum request handlers.
//! - **`server`**: Listener binding, the router, and the cluster launcher.

pub mod handlers;
pub mod memory;
pub mod protocol;
pub mod server;
