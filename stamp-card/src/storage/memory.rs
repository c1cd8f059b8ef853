//! In-process key-value store

use super::{KeyValueStore, StorageError, StorageResult, WriteBatch, WriteOp};
use std::collections::HashMap;
use std::sync::Mutex;

/// Volatile store backed by a `HashMap`
///
/// Used by tests and by hosts that only need a session-long card.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored key, sorted
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let data = self.lock()?;
        let mut keys: Vec<String> = data.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.data
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn apply(&self, batch: WriteBatch) -> StorageResult<()> {
        let mut data = self.lock()?;
        for op in batch.into_ops() {
            match op {
                WriteOp::Set { key, value } => {
                    data.insert(key, value);
                }
                WriteOp::Remove { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_batch() {
        let store = MemoryStore::new();
        store.set("stale", "x").unwrap();

        let mut batch = WriteBatch::new();
        batch.set("a", "1").set("b", "2").remove("stale");
        store.apply(batch).unwrap();

        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nothing").unwrap(), None);
    }
}
