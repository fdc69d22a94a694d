use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uk_types::{KeyId, Record};

use crate::codec::RecordCodec;
use crate::config::{LockMode, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::hasher::KeyHasher;
use crate::lock::LockTable;
use crate::traits::{KeyValueStore, PutOutcome};

/// One line of a store inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSummary {
    pub id: KeyId,
    pub key: String,
    pub content_type: String,
    pub size: u64,
}

/// Filesystem-backed key/value store.
///
/// Each record is written to `<root>/<hex identifier>`. There is no manifest
/// and no cache: the directory listing is the index, and every read goes to
/// disk. Writes use create/truncate/write while holding exclusive access, so
/// no reader observes a half-written file. A crash mid-write can still leave a
/// truncated file behind; the codec's CRC frame reports it as corrupt.
pub struct FsStore {
    root: PathBuf,
    hasher: KeyHasher,
    locks: LockTable,
    sync_writes: bool,
}

impl FsStore {
    /// Open a store rooted at `config.root`, creating the directory if needed.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.root)?;
        if !fs::metadata(&config.root)?.is_dir() {
            return Err(StoreError::Io(io::Error::other(format!(
                "store root {} is not a directory",
                config.root.display()
            ))));
        }

        debug!(root = %config.root.display(), lock_mode = %config.lock_mode, "opened store");
        Ok(Self {
            root: config.root,
            hasher: KeyHasher::STORE_KEY,
            locks: LockTable::new(config.lock_mode),
            sync_writes: config.sync_writes,
        })
    }

    /// Directory holding the record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lock_mode(&self) -> LockMode {
        self.locks.mode()
    }

    /// Identifier for a logical key.
    pub fn identify(&self, key: &str) -> KeyId {
        self.hasher.hash_str(key)
    }

    /// Path of the file that holds (or would hold) the record for `id`.
    pub fn path_for(&self, id: &KeyId) -> PathBuf {
        self.root.join(id.to_hex())
    }

    /// Scan the store directory and summarize every decodable record,
    /// sorted by key.
    ///
    /// Each file is read under shared access to its own identifier, so the
    /// listing is consistent per record but not a snapshot of the whole store.
    /// Files not named like an identifier are ignored; undecodable ones are
    /// logged and skipped.
    pub fn list(&self) -> StoreResult<Vec<RecordSummary>> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let Some(id) = entry.file_name().to_str().and_then(|n| n.parse::<KeyId>().ok()) else {
                continue;
            };

            let data = match self.locks.with_shared(&id, || fs::read(entry.path())) {
                Ok(data) => data,
                // Deleted between the directory scan and the read.
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            match RecordCodec::decode(&data) {
                Ok(record) => summaries.push(RecordSummary {
                    id,
                    size: record.size(),
                    key: record.key,
                    content_type: record.content_type,
                }),
                Err(e) => warn!(%id, error = %e, "skipping undecodable record file"),
            }
        }
        summaries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(summaries)
    }
}

impl KeyValueStore for FsStore {
    fn put(&self, key: &str, content_type: &str, value: Vec<u8>) -> StoreResult<PutOutcome> {
        let id = self.identify(key);
        let record = Record::new(key, content_type, value);
        let data =
            RecordCodec::encode(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let path = self.path_for(&id);

        let outcome = self.locks.with_exclusive(&id, || -> io::Result<PutOutcome> {
            let existed = match fs::symlink_metadata(&path) {
                Ok(_) => true,
                Err(e) if e.kind() == io::ErrorKind::NotFound => false,
                Err(e) => return Err(e),
            };

            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)?;
            file.write_all(&data)?;
            if self.sync_writes {
                file.sync_all()?;
            }

            Ok(if existed {
                PutOutcome::Updated
            } else {
                PutOutcome::Created
            })
        })?;

        debug!(%id, key, bytes = record.value.len(), ?outcome, "put");
        Ok(outcome)
    }

    fn get(&self, key: &str) -> StoreResult<Record> {
        let id = self.identify(key);
        let path = self.path_for(&id);

        let data = match self.locks.with_shared(&id, || fs::read(&path)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let record = RecordCodec::decode(&data).map_err(|e| StoreError::CorruptRecord {
            id,
            reason: e.to_string(),
        })?;
        if record.key != key {
            warn!(%id, requested = key, stored = %record.key, "identifier collision");
        }

        debug!(%id, key, bytes = record.value.len(), "get");
        Ok(record)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let id = self.identify(key);
        let path = self.path_for(&id);

        match self.locks.with_exclusive(&id, || fs::remove_file(&path)) {
            Ok(()) => {
                debug!(%id, key, "delete");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        let id = self.identify(key);
        let path = self.path_for(&id);
        match self.locks.with_shared(&id, || fs::symlink_metadata(&path)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for FsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsStore")
            .field("root", &self.root)
            .field("locks", &self.locks)
            .field("sync_writes", &self.sync_writes)
            .finish()
    }
}
