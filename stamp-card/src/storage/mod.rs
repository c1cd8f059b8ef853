//! Key-value storage port and backends
//!
//! The stamp card keeps every piece of state as a UTF-8 string under a
//! string key. Structured values (coupons, stamp records) are JSON.
//!
//! # Atomicity
//!
//! A logical update that touches several keys (count + date + stamped set +
//! coupons) is expressed as one [`WriteBatch`]. Backends must apply a batch
//! all-or-nothing, so a failed write never leaves a count persisted without
//! its date.
//!
//! | Backend | Batch discipline |
//! |---------|------------------|
//! | [`MemoryStore`] | applied under a single mutex guard |
//! | [`RedbStore`] | one redb write transaction |

mod memory;
mod redb_store;

pub use self::memory::MemoryStore;
pub use self::redb_store::RedbStore;

use std::sync::Arc;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] ::redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] ::redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] ::redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] ::redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] ::redb::CommitError),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A single mutation inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl WriteOp {
    pub fn key(&self) -> &str {
        match self {
            WriteOp::Set { key, .. } | WriteOp::Remove { key } => key,
        }
    }
}

/// Ordered set of mutations applied atomically by [`KeyValueStore::apply`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write of `value` under `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Queue removal of `key`
    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Remove { key: key.into() });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// String-keyed persistent store bound to one device/profile
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Apply every operation of `batch`, or none of them
    fn apply(&self, batch: WriteBatch) -> StorageResult<()>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut batch = WriteBatch::new();
        batch.set(key, value);
        self.apply(batch)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut batch = WriteBatch::new();
        batch.remove(key);
        self.apply(batch)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn apply(&self, batch: WriteBatch) -> StorageResult<()> {
        (**self).apply(batch)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn apply(&self, batch: WriteBatch) -> StorageResult<()> {
        (**self).apply(batch)
    }
}
