//! Consistent hashing ring.

use super::HashRing;
use super::types::{Node, crc32};
use crate::error::RingError;

/// Consistent hashing ring over a sorted node list.
///
/// Nodes are kept sorted ascending by position at all times. A key is owned by the first
/// node whose position is greater than or equal to the key's CRC32, wrapping around to
/// the lowest node when the key lies past every node. Adding or removing a node only
/// moves the keys between that node and its predecessor.
#[derive(Debug, Clone, Default)]
pub struct ConsistentRing {
    nodes: Vec<Node>,
}

impl ConsistentRing {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Inserts a node at its sorted position.
    ///
    /// Nodes sharing a position keep their insertion order; the earliest one owns the
    /// keys landing there.
    pub fn insert(&mut self, node: Node) -> Result<(), RingError> {
        if self.nodes.iter().any(|existing| existing.id == node.id) {
            return Err(RingError::DuplicateNode(node.id));
        }

        let idx = self.nodes.partition_point(|existing| existing.hash <= node.hash);
        tracing::debug!("Ring: placing {} at {} (slot {})", node.id, node.hash, idx);
        self.nodes.insert(idx, node);
        Ok(())
    }

    /// Removes the node with this identifier and position.
    ///
    /// Different identifiers can collide on one position, so the whole run of nodes at
    /// `node.hash` is searched by identifier.
    pub fn remove_node(&mut self, node: &Node) -> Result<(), RingError> {
        let start = self
            .nodes
            .partition_point(|existing| existing.hash < node.hash);

        let offset = self.nodes[start..]
            .iter()
            .take_while(|existing| existing.hash == node.hash)
            .position(|existing| existing.id == node.id)
            .ok_or_else(|| RingError::NodeNotFound(node.id.clone()))?;

        let removed = self.nodes.remove(start + offset);
        tracing::debug!("Ring: removed {} from {}", removed.id, removed.hash);
        Ok(())
    }

    /// Returns the owner of a key already hashed to `hash`.
    pub fn get_by_hash(&self, hash: u32) -> Result<&str, RingError> {
        let idx = self.nodes.partition_point(|node| node.hash < hash);

        self.nodes
            .get(idx)
            .or_else(|| self.nodes.first())
            .map(|node| node.id.as_str())
            .ok_or(RingError::EmptyRing)
    }
}

impl HashRing for ConsistentRing {
    fn add(&mut self, identifier: &str) -> Result<(), RingError> {
        self.insert(Node::new(identifier))
    }

    fn remove(&mut self, identifier: &str) -> Result<(), RingError> {
        self.remove_node(&Node::new(identifier))
    }

    fn get(&self, key: &str) -> Result<&str, RingError> {
        self.get_by_hash(crc32(key))
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
