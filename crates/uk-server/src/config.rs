use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uk_store::{LockMode, StoreConfig};

use crate::error::{ServerError, ServerResult};

/// Server configuration. Every field has a default, so a TOML file only needs
/// the values it overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory exclusively owned by the key/value store.
    pub data_dir: PathBuf,
    /// Whole-request budget; slower requests get `408 Request Timeout`.
    pub request_timeout_secs: u64,
    pub max_body_size: usize,
    pub lock_mode: LockMode,
    pub sync_writes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 80)),
            data_dir: PathBuf::from("/var/lib/utilityknife"),
            request_timeout_secs: 10,
            max_body_size: 32 * 1024 * 1024,
            lock_mode: LockMode::Global,
            sync_writes: false,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.data_dir)
            .with_lock_mode(self.lock_mode)
            .with_sync_writes(self.sync_writes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:80".parse::<SocketAddr>().unwrap());
        assert_eq!(c.data_dir, PathBuf::from("/var/lib/utilityknife"));
        assert_eq!(c.request_timeout(), Duration::from_secs(10));
        assert_eq!(c.max_body_size, 32 * 1024 * 1024);
        assert_eq!(c.lock_mode, LockMode::Global);
        assert!(!c.sync_writes);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "127.0.0.1:8080"
            lock_mode = "per-key"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.lock_mode, LockMode::PerKey);
        assert_eq!(c.data_dir, PathBuf::from("/var/lib/utilityknife"));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 42").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uk.toml");
        std::fs::write(&path, "data_dir = \"/srv/uk\"\nsync_writes = true\n").unwrap();
        let c = ServerConfig::from_file(&path).unwrap();
        assert_eq!(c.data_dir, PathBuf::from("/srv/uk"));
        assert!(c.sync_writes);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ServerConfig::from_file(Path::new("/nonexistent/uk.toml")).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn store_config_carries_options() {
        let c = ServerConfig {
            data_dir: "/tmp/uk".into(),
            lock_mode: LockMode::PerKey,
            sync_writes: true,
            ..ServerConfig::default()
        };
        let s = c.store_config();
        assert_eq!(s.root, PathBuf::from("/tmp/uk"));
        assert_eq!(s.lock_mode, LockMode::PerKey);
        assert!(s.sync_writes);
    }
}
