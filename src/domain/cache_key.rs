use std::fmt;

use sha2::{Digest, Sha256};

use super::AudioSource;

/// Fingerprint of an audio source identity plus a canonical option descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(source: &AudioSource, descriptor: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source.identity().as_bytes());
        hasher.update(b":");
        hasher.update(descriptor.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
