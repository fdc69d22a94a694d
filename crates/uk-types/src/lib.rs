//! Foundation types for Utility Knife.
//!
//! Every other `uk-*` crate depends on `uk-types`.
//!
//! # Key Types
//!
//! - [`KeyId`] — filesystem-safe identifier derived from a logical key
//! - [`Record`] — the unit of storage: key, content type and payload

pub mod error;
pub mod key;
pub mod record;

pub use error::TypeError;
pub use key::KeyId;
pub use record::Record;
