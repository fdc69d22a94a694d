use uk_types::KeyId;

/// Domain-separated BLAKE3 key hasher.
///
/// The domain tag is prepended to every key before hashing, so identifiers
/// produced for store keys never coincide with digests computed elsewhere
/// over the same bytes. Distinct keys that collide alias to the same record.
pub struct KeyHasher {
    domain: &'static str,
}

impl KeyHasher {
    /// Hasher for store keys.
    pub const STORE_KEY: Self = Self {
        domain: "uk-key-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Derive the identifier for a logical key.
    pub fn hash(&self, key: &[u8]) -> KeyId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(key);
        KeyId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Shorthand for hashing a string key.
    pub fn hash_str(&self, key: &str) -> KeyId {
        self.hash(key.as_bytes())
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

impl Default for KeyHasher {
    fn default() -> Self {
        Self::STORE_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = KeyHasher::STORE_KEY.hash_str("/data/hello");
        let b = KeyHasher::STORE_KEY.hash_str("/data/hello");
        assert_eq!(a, b);
    }

    #[test]
    fn different_keys_produce_different_ids() {
        let a = KeyHasher::STORE_KEY.hash_str("/data/a");
        let b = KeyHasher::STORE_KEY.hash_str("/data/b");
        assert_ne!(a, b);
    }

    #[test]
    fn output_is_fixed_width_filename() {
        for key in ["", "/", "/data/../../etc/passwd", "/data/ünïcödé?x=1&y=2"] {
            let hex = KeyHasher::STORE_KEY.hash_str(key).to_hex();
            assert_eq!(hex.len(), 64);
            assert!(!hex.contains('/'));
            assert!(!hex.contains('\\'));
        }
    }

    #[test]
    fn custom_domain_differs() {
        let custom = KeyHasher::new("other-domain-v1");
        assert_eq!(custom.domain(), "other-domain-v1");
        assert_ne!(custom.hash(b"k"), KeyHasher::STORE_KEY.hash(b"k"));
    }

    #[test]
    fn default_is_store_key_domain() {
        assert_eq!(KeyHasher::default().domain(), "uk-key-v1");
    }
}
