use std::sync::Arc;
use std::time::Duration;

use uk_store::KeyValueStore;

use crate::config::ServerConfig;
use crate::info::HostInfo;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub host: Arc<HostInfo>,
    pub max_body_size: usize,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, host: HostInfo, config: &ServerConfig) -> Self {
        Self {
            store,
            host: Arc::new(host),
            max_body_size: config.max_body_size,
            request_timeout: config.request_timeout(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("host", &self.host)
            .field("max_body_size", &self.max_body_size)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
