//! Sharded Key/Value Store Library
//!
//! This library crate defines the core modules of a sharded in-memory key/value store
//! whose partitioning is driven entirely by the client.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of four loosely coupled subsystems:
//!
//! - **`hashring`**: Key-to-node assignment. Two interchangeable strategies (consistent
//!   ring hashing and rendezvous/HRW hashing) behind one `HashRing` trait.
//! - **`router`**: The client side. Computes the owning node of each key and dispatches
//!   writes to that node over HTTP, one independent request per key/value pair.
//! - **`storage`**: The server side. One in-memory `ShardStore` per listening port,
//!   exposed through a minimal HTTP protocol, plus the launcher for a local cluster.
//! - **`config`**: Parsing of port ranges and `key->value` assignment lists used by the CLI.
//!
//! Servers never talk to each other. A write sent to the "wrong" shard is accepted and
//! stored there: nothing server-side can detect a misrouted key, so every client must
//! share the same node set and strategy.

pub mod config;
pub mod error;
pub mod hashring;
pub mod router;
pub mod storage;
