//! redb-based key-value store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `kv` | storage key | UTF-8 string | Every stamp card value, all profiles |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns and the file is
//! always in a consistent state. A [`WriteBatch`] maps onto one write
//! transaction, so either every key of a stamp update lands or none does.

use super::{KeyValueStore, StorageResult, WriteBatch, WriteOp};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Table for all values: key = storage key, value = stored string
const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

/// Key-value store backed by a redb database
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create the table up front so read transactions never see it missing
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn apply(&self, batch: WriteBatch) -> StorageResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let ops = batch.len();
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            for op in batch.ops() {
                match op {
                    WriteOp::Set { key, value } => {
                        table.insert(key.as_str(), value.as_str())?;
                    }
                    WriteOp::Remove { key } => {
                        table.remove(key.as_str())?;
                    }
                }
            }
        }
        write_txn.commit()?;

        tracing::debug!(ops, "Write batch committed");
        Ok(())
    }
}
