use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Width of a key digest in bytes.
pub const KEY_ID_LEN: usize = 32;

/// Identifier of a stored record.
///
/// A `KeyId` is the digest of a logical key. Its hex form is used directly as
/// the record's filename, so it never contains path separators or characters
/// that are reserved on common filesystems.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId([u8; KEY_ID_LEN]);

impl KeyId {
    /// Wrap a pre-computed digest.
    pub const fn from_hash(hash: [u8; KEY_ID_LEN]) -> Self {
        Self(hash)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_ID_LEN] {
        &self.0
    }

    /// Lowercase hex representation (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters), for logs.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != KEY_ID_LEN {
            return Err(TypeError::InvalidLength {
                expected: KEY_ID_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; KEY_ID_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self.short_hex())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for KeyId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; KEY_ID_LEN]> for KeyId {
    fn from(bytes: [u8; KEY_ID_LEN]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let id = KeyId::from_hash([0xab; KEY_ID_LEN]);
        let parsed = KeyId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn hex_is_lowercase_and_fixed_width() {
        let id = KeyId::from_hash([0xCD; KEY_ID_LEN]);
        let hex = id.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn short_hex_is_8_chars() {
        let id = KeyId::from_hash([7; KEY_ID_LEN]);
        assert_eq!(id.short_hex().len(), 8);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!(KeyId::from_hex("not-hex"), Err(TypeError::InvalidHex(_))));
    }

    #[test]
    fn rejects_wrong_length() {
        let err = KeyId::from_hex("abcd").unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { expected: 32, actual: 2 });
    }

    #[test]
    fn from_str_matches_from_hex() {
        let id = KeyId::from_hash([1; KEY_ID_LEN]);
        let parsed: KeyId = id.to_hex().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serde_roundtrip() {
        let id = KeyId::from_hash([9; KEY_ID_LEN]);
        let json = serde_json::to_string(&id).unwrap();
        let parsed: KeyId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
