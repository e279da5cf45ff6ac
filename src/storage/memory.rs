use crate::error::StoreError;

use dashmap::DashMap;

/// In-memory key/value map backing one shard server.
///
/// One store is created per listening port and shared (through an `Arc`) by every request
/// handler serving that port. All access goes through a `DashMap`, so concurrent
/// get/set/unset calls on the same key are serialized by its shard lock and concurrent
/// writers never lose updates.
///
/// The store accepts any key it is given. It cannot tell whether the key actually hashes
/// to this shard, so a misrouted write is stored here silently.
#[derive(Debug, Default)]
pub struct ShardStore {
    data: DashMap<i64, String>,
}

impl ShardStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Returns the value for `key`, or `StoreError::NotFound` when absent.
    pub fn get(&self, key: i64) -> Result<String, StoreError> {
        self.lookup(key).ok_or(StoreError::NotFound(key))
    }

    pub fn lookup(&self, key: i64) -> Option<String> {
        self.data.get(&key).map(|entry| entry.value().clone())
    }

    /// Inserts or overwrites the value for `key`.
    pub fn set(&self, key: i64, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!("Store: set {} = {}", key, value);
        self.data.insert(key, value);
    }

    /// Removes `key`. Missing keys are ignored.
    pub fn unset(&self, key: i64) {
        if self.data.remove(&key).is_some() {
            tracing::debug!("Store: unset {}", key);
        }
    }

    /// Snapshot of every entry, in no particular order.
    pub fn entries(&self) -> Vec<(i64, String)> {
        self.data
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
