use std::collections::HashMap;
use std::sync::RwLock;

use uk_types::{KeyId, Record};

use crate::error::{StoreError, StoreResult};
use crate::hasher::KeyHasher;
use crate::traits::{KeyValueStore, PutOutcome};

/// In-memory, HashMap-based key/value store.
///
/// Intended for tests and embedding. Records are addressed by the same
/// identifiers as [`FsStore`](crate::FsStore) and held behind a single
/// `RwLock`, so the locking discipline matches the default filesystem store.
pub struct InMemoryStore {
    hasher: KeyHasher,
    records: RwLock<HashMap<KeyId, Record>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            hasher: KeyHasher::STORE_KEY,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }

    /// Remove all records from the store.
    pub fn clear(&self) {
        self.records.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn put(&self, key: &str, content_type: &str, value: Vec<u8>) -> StoreResult<PutOutcome> {
        let id = self.hasher.hash_str(key);
        let record = Record::new(key, content_type, value);
        let mut map = self.records.write().expect("lock poisoned");
        Ok(match map.insert(id, record) {
            Some(_) => PutOutcome::Updated,
            None => PutOutcome::Created,
        })
    }

    fn get(&self, key: &str) -> StoreResult<Record> {
        let id = self.hasher.hash_str(key);
        let map = self.records.read().expect("lock poisoned");
        map.get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let id = self.hasher.hash_str(key);
        let mut map = self.records.write().expect("lock poisoned");
        map.remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        let id = self.hasher.hash_str(key);
        Ok(self.records.read().expect("lock poisoned").contains_key(&id))
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("record_count", &self.len())
            .finish()
    }
}
