//! Rendezvous Hashing (Highest Random Weight)
//!
//! For every lookup each node gets a pseudo-random weight derived from its own position
//! and the key's FNV-1a hash; the heaviest node owns the key.
//!
//! Properties:
//! - No global ordering: nodes are kept in insertion order and scanned on every lookup.
//! - Minimal disruption: removing a node only moves the keys it owned, adding one only
//!   steals keys for itself (roughly 1/n of them).
//! - Ties go to the first maximal node in scan order, which is insertion order.
//!
//! The weight is the two-step linear congruential scramble from Thaler & Ravishankar,
//! "A Name-Based Mapping Scheme for Rendezvous" (CSE-TR-316-96).

use super::HashRing;
use super::types::{Node, fnv1a_32};
use crate::error::RingError;

const LCG_MULTIPLIER: u32 = 1_103_515_245;
const LCG_INCREMENT: u32 = 12_345;

/// Computes the weight of a node for a key.
///
/// All arithmetic wraps at 32 bits. The result is read as a signed 32-bit value and
/// negative values are folded back with `+ (2^31 - 1)`. `i32::MIN` is the only input the
/// fold leaves negative; it is clamped to zero.
pub fn weight(node_hash: u32, key_hash: u32) -> i64 {
    let mixed = LCG_MULTIPLIER
        .wrapping_mul(node_hash)
        .wrapping_add(LCG_INCREMENT)
        ^ key_hash;
    let raw = LCG_MULTIPLIER.wrapping_mul(mixed.wrapping_add(LCG_INCREMENT)) as i32;

    if raw < 0 {
        (i64::from(raw) + i64::from(i32::MAX)).max(0)
    } else {
        i64::from(raw)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RendezvousRing {
    nodes: Vec<Node>,
}

impl RendezvousRing {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Appends a node to the scan order.
    pub fn insert(&mut self, node: Node) -> Result<(), RingError> {
        if self.nodes.iter().any(|existing| existing.id == node.id) {
            return Err(RingError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Returns the owner of a key already hashed to `key_hash`.
    pub fn get_by_hash(&self, key_hash: u32) -> Result<&str, RingError> {
        let mut best: Option<(&Node, i64)> = None;

        for node in &self.nodes {
            let candidate = weight(node.hash, key_hash);
            // Strictly greater: the first maximal node keeps the key.
            if best.is_none_or(|(_, current)| candidate > current) {
                best = Some((node, candidate));
            }
        }

        best.map(|(node, _)| node.id.as_str())
            .ok_or(RingError::EmptyRing)
    }
}

impl HashRing for RendezvousRing {
    fn add(&mut self, identifier: &str) -> Result<(), RingError> {
        self.insert(Node::new(identifier))
    }

    fn remove(&mut self, identifier: &str) -> Result<(), RingError> {
        let idx = self
            .nodes
            .iter()
            .position(|node| node.id == identifier)
            .ok_or_else(|| RingError::NodeNotFound(identifier.to_string()))?;

        self.nodes.remove(idx);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<&str, RingError> {
        self.get_by_hash(fnv1a_32(key))
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
