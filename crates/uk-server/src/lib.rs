//! HTTP server for Utility Knife.
//!
//! A small diagnostic service: it reports the serving host's identity, echoes
//! requests back, and exposes a filesystem-backed key/value store under
//! `/data/`.
//!
//! ## Routes
//!
//! - `/` -- server data as HTML (also served for unmatched paths)
//! - `/json` -- server data as JSON
//! - `/echo/*` -- request dump, any method
//! - `/data/*` -- `PUT`, `GET`, `DELETE` records keyed by the request path
//!
//! Every response carries `X-Hostname`, `X-IP` and `X-Served-By` headers.

pub mod config;
pub mod data;
pub mod error;
pub mod handler;
pub mod info;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use info::{HostInfo, ServerInfo};
pub use server::UkServer;
pub use state::AppState;

/// Value of the `X-Served-By` header.
pub const SERVICE_NAME: &str = "weters/utilityknife";
