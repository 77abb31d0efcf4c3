use std::time::Duration;

use crate::domain::{CacheKey, TranscriptionResult};

/// In-process store of completed transcripts keyed by request fingerprint.
///
/// Implementations expire entries lazily: a read of an entry older than
/// [`ResultCache::ttl`] removes it and reports a miss.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<TranscriptionResult>;

    fn put(&self, key: CacheKey, result: TranscriptionResult);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sample_keys(&self, limit: usize) -> Vec<CacheKey>;

    fn ttl(&self) -> Duration;
}
