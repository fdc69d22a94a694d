use uk_types::Record;

use crate::error::StoreResult;

/// Whether a `put` created a new record or replaced an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutOutcome {
    Created,
    Updated,
}

/// Key/value blob store.
///
/// All implementations must satisfy these invariants:
/// - A `put` is fully visible to every operation that starts after it returns.
/// - A `get` racing a `put` on the same key sees the old or the new record,
///   never a mixture of both.
/// - `get` and `delete` on an absent key fail with `NotFound` and change nothing.
/// - Errors are surfaced as-is. Nothing is retried.
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous record.
    fn put(&self, key: &str, content_type: &str, value: Vec<u8>) -> StoreResult<PutOutcome>;

    /// Fetch the record stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Record>;

    /// Remove the record stored under `key`.
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// Check whether a record exists for `key`.
    ///
    /// Default implementation calls `get()` and discards the record.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
