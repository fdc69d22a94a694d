use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locking granularity for a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockMode {
    /// One reader/writer lock for the whole store.
    #[default]
    Global,
    /// One reader/writer lock per key identifier, created on demand.
    PerKey,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::PerKey => write!(f, "per-key"),
        }
    }
}

impl FromStr for LockMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "per-key" => Ok(Self::PerKey),
            other => Err(format!("unknown lock mode: {other}")),
        }
    }
}

/// Configuration for a filesystem store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one file per record. Created on open if missing.
    pub root: PathBuf,
    pub lock_mode: LockMode,
    /// `fsync` each record file before `put` returns.
    pub sync_writes: bool,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock_mode: LockMode::default(),
            sync_writes: false,
        }
    }

    pub fn with_lock_mode(mut self, lock_mode: LockMode) -> Self {
        self.lock_mode = lock_mode;
        self
    }

    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = StoreConfig::new("/tmp/store");
        assert_eq!(c.root, PathBuf::from("/tmp/store"));
        assert_eq!(c.lock_mode, LockMode::Global);
        assert!(!c.sync_writes);
    }

    #[test]
    fn builder() {
        let c = StoreConfig::new("d")
            .with_lock_mode(LockMode::PerKey)
            .with_sync_writes(true);
        assert_eq!(c.lock_mode, LockMode::PerKey);
        assert!(c.sync_writes);
    }

    #[test]
    fn lock_mode_parse_and_display() {
        for mode in [LockMode::Global, LockMode::PerKey] {
            assert_eq!(mode.to_string().parse::<LockMode>().unwrap(), mode);
        }
        assert!("sharded".parse::<LockMode>().is_err());
    }
}
