//! # redb-backed Key-Value Storage
//!
//! A disk-backed [`KvStore`] using the redb embedded database, providing:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - Zero configuration
//!
//! One table, `records`, maps string keys to opaque byte values. The state
//! store keeps its whole versioned record under a single key, so every
//! write is one transaction.

use crate::FruitbenchError;
use crate::storage::KvStore;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

/// Table for persisted records: key string -> serialized record bytes.
const RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

/// A disk-backed key-value store using redb.
pub struct RedbKv {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for RedbKv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbKv").finish_non_exhaustive()
    }
}

impl RedbKv {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FruitbenchError> {
        let db = Database::create(path.as_ref())
            .map_err(|e| FruitbenchError::IoError(e.to_string()))?;

        // Initialize the table if it doesn't exist, so reads never fail
        // on a fresh database.
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(RECORDS)
                .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), FruitbenchError> {
        self.db
            .compact()
            .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        Ok(())
    }
}

impl KvStore for RedbKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, FruitbenchError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(RECORDS)
            .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        let value = table
            .get(key)
            .map_err(|e| FruitbenchError::IoError(e.to_string()))?
            .map(|guard| guard.value().to_vec());
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), FruitbenchError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(RECORDS)
                .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), FruitbenchError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(RECORDS)
                .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| FruitbenchError::IoError(e.to_string()))?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
