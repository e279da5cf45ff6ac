//! Hash Ring Module
//!
//! Decides which node owns a key. Every client computes the same decision from the same
//! node set, which is the only thing keeping the shards disjoint.
//!
//! ## Strategies
//! - **Ring** (`ring`): nodes sit on a sorted `u32` ring at their CRC32 position. A key is
//!   owned by the first node at or after its own position, wrapping to the lowest node.
//!   O(log n) lookup.
//! - **Rendezvous** (`rendezvous`): every node gets a pseudo-random weight for the key and
//!   the heaviest node wins. No ordering to maintain, O(n) lookup.
//!
//! Both strategies are exposed through the [`HashRing`] trait and picked at construction
//! time with [`Strategy::build`].
//!
//! ## Submodules
//! - **`types`**: The `Node` record and the hash functions.
//! - **`ring`**: Consistent ring hashing.
//! - **`rendezvous`**: Highest-random-weight hashing.

pub mod rendezvous;
pub mod ring;
pub mod types;


use crate::error::RingError;
use serde::{Deserialize, Serialize};

pub use rendezvous::RendezvousRing;
pub use ring::ConsistentRing;
pub use types::Node;

/// Key-to-node assignment over a set of node identifiers.
pub trait HashRing: Send + Sync {
    /// Registers a node. Adding an identifier twice is a caller error.
    fn add(&mut self, identifier: &str) -> Result<(), RingError>;

    /// Unregisters a node.
    fn remove(&mut self, identifier: &str) -> Result<(), RingError>;

    /// Returns the identifier of the node owning `key`.
    fn get(&self, key: &str) -> Result<&str, RingError>;

    /// Registered nodes, in the order the strategy keeps them.
    fn nodes(&self) -> &[Node];

    fn len(&self) -> usize {
        self.nodes().len()
    }

    fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }

    fn contains(&self, identifier: &str) -> bool {
        self.nodes().iter().any(|node| node.id == identifier)
    }
}

/// Which hashing strategy a router uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Consistent hashing on a sorted ring.
    #[default]
    Ring,
    /// Highest-random-weight hashing.
    #[value(alias = "hrw")]
    Rendezvous,
}

impl Strategy {
    /// Creates an empty ring of this strategy.
    pub fn build(self) -> Box<dyn HashRing> {
        match self {
            Strategy::Ring => Box::new(ConsistentRing::new()),
            Strategy::Rendezvous => Box::new(RendezvousRing::new()),
        }
    }

    /// Creates a ring of this strategy holding `identifiers`.
    pub fn build_with<I, S>(self, identifiers: I) -> Result<Box<dyn HashRing>, RingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ring = self.build();
        for identifier in identifiers {
            ring.add(identifier.as_ref())?;
        }
        Ok(ring)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Ring => f.write_str("ring"),
            Strategy::Rendezvous => f.write_str("rendezvous"),
        }
    }
}
