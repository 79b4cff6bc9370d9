//! # Key-Value Storage Backends
//!
//! The persistence layer treats its durable medium as a plain key-value
//! store: one string key, one opaque byte value. Two backends implement
//! the contract:
//! - [`MemoryKv`]: in-memory `BTreeMap` (fast, volatile; tests and
//!   ephemeral runs)
//! - [`RedbKv`]: disk-backed redb database (ACID, persistent)

mod redb_kv;

pub use redb_kv::RedbKv;

use crate::FruitbenchError;
use std::collections::BTreeMap;

/// Minimal key-value contract the state store runs on.
pub trait KvStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, FruitbenchError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), FruitbenchError>;

    /// Delete the value stored under `key`. Deleting a missing key is a
    /// no-op, not an error.
    fn remove(&mut self, key: &str) -> Result<(), FruitbenchError>;
}

/// Volatile in-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    records: BTreeMap<String, Vec<u8>>,
}

impl MemoryKv {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, FruitbenchError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), FruitbenchError> {
        self.records.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), FruitbenchError> {
        self.records.remove(key);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_kv_set_get_remove() {
        let mut kv = MemoryKv::new();
        assert_eq!(kv.get("key").expect("get"), None);

        kv.set("key", b"value").expect("set");
        assert_eq!(kv.get("key").expect("get"), Some(b"value".to_vec()));

        kv.set("key", b"other").expect("set");
        assert_eq!(kv.get("key").expect("get"), Some(b"other".to_vec()));

        kv.remove("key").expect("remove");
        assert_eq!(kv.get("key").expect("get"), None);

        // Removing a missing key is a no-op.
        kv.remove("key").expect("remove");
    }
}
