use serde::{Deserialize, Serialize};

/// A stored record: the logical key, the writer's content type and the payload.
///
/// The key is kept inside the record even though the store addresses files by
/// digest, so a store directory can be inventoried without a separate index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub content_type: String,
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(key: impl Into<String>, content_type: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            content_type: content_type.into(),
            value,
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.value.len() as u64
    }
}
