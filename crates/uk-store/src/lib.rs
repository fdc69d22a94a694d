//! Key/value blob storage for Utility Knife.
//!
//! Maps arbitrary logical keys (URL paths) to opaque byte payloads tagged with
//! a content type. Each record lives in its own file, named by the digest of
//! its key; the directory itself is the index.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyValueStore`] trait:
//!
//! - [`FsStore`] -- one file per record under a store directory
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Writers exclude every other operation; readers share access.
//! 2. A record is fully visible once `put` returns. No torn reads.
//! 3. Nothing is cached. Every `get` goes to the filesystem.
//! 4. Errors are never retried and never hidden.

pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod hasher;
pub mod lock;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::RecordCodec;
pub use config::{LockMode, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use fs::{FsStore, RecordSummary};
pub use hasher::KeyHasher;
pub use memory::InMemoryStore;
pub use traits::{KeyValueStore, PutOutcome};
pub use uk_types::{KeyId, Record};
