const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// A node registered on a hash ring.
///
/// The identifier is opaque to the ring (the router uses base URLs). The position is
/// derived from the identifier once and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    pub id: String,
    pub hash: u32,
}

impl Node {
    /// Creates a node positioned at the CRC32 of its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let hash = crc32(&id);
        Self { id, hash }
    }

    /// Creates a node at an explicit position.
    pub fn with_hash(id: impl Into<String>, hash: u32) -> Self {
        Self {
            id: id.into(),
            hash,
        }
    }
}

/// CRC32 (IEEE) of a string. Node positions on both strategies and key positions on the
/// ring use it.
pub fn crc32(value: &str) -> u32 {
    crc32fast::hash(value.as_bytes())
}

/// 32-bit FNV-1a of a string. Key positions for rendezvous hashing use it.
pub fn fnv1a_32(value: &str) -> u32 {
    value.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
