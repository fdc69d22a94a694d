use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use uk_types::KeyId;

use crate::config::LockMode;

type KeyLock = Arc<RwLock<()>>;

/// Reader/writer locking for a store, at whole-store or per-key granularity.
///
/// In [`LockMode::PerKey`] mode each identifier gets its own lock, created on
/// first use and dropped from the table once no operation holds it.
pub struct LockTable {
    mode: LockMode,
    global: RwLock<()>,
    keys: Mutex<HashMap<KeyId, KeyLock>>,
}

impl LockTable {
    pub fn new(mode: LockMode) -> Self {
        Self {
            mode,
            global: RwLock::new(()),
            keys: Mutex::new(HashMap::new()),
        }
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Run `f` with shared access to `id`.
    pub fn with_shared<T>(&self, id: &KeyId, f: impl FnOnce() -> T) -> T {
        match self.mode {
            LockMode::Global => {
                let _guard = self.global.read().unwrap_or_else(|e| e.into_inner());
                f()
            }
            LockMode::PerKey => {
                let lease = self.lease(id);
                let _guard = lease
                    .lock
                    .as_ref()
                    .map(|l| l.read().unwrap_or_else(|e| e.into_inner()));
                f()
            }
        }
    }

    /// Run `f` with exclusive access to `id`.
    pub fn with_exclusive<T>(&self, id: &KeyId, f: impl FnOnce() -> T) -> T {
        match self.mode {
            LockMode::Global => {
                let _guard = self.global.write().unwrap_or_else(|e| e.into_inner());
                f()
            }
            LockMode::PerKey => {
                let lease = self.lease(id);
                let _guard = lease
                    .lock
                    .as_ref()
                    .map(|l| l.write().unwrap_or_else(|e| e.into_inner()));
                f()
            }
        }
    }

    /// Number of per-key locks currently held in the table.
    pub fn live_keys(&self) -> usize {
        self.table().len()
    }

    fn lease(&self, id: &KeyId) -> Lease<'_> {
        let lock = self.table().entry(*id).or_default().clone();
        Lease {
            table: self,
            id: *id,
            lock: Some(lock),
        }
    }

    // The locks guard no data, so a poisoned mutex is still usable.
    fn table(&self) -> MutexGuard<'_, HashMap<KeyId, KeyLock>> {
        self.keys.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for LockTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockTable")
            .field("mode", &self.mode)
            .field("live_keys", &self.live_keys())
            .finish()
    }
}

/// A reference to one per-key lock. Removes the table entry on drop when it
/// was the last user.
struct Lease<'a> {
    table: &'a LockTable,
    id: KeyId,
    // `Some` until the lease drops.
    lock: Option<KeyLock>,
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        let mut table = self.table.table();
        // Our reference must be gone before the count is read.
        drop(self.lock.take());
        if table.get(&self.id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            table.remove(&self.id);
        }
    }
}
