use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::application::ports::ResultCache;
use crate::domain::{CacheKey, TranscriptionResult};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
    result: TranscriptionResult,
    inserted_at: Instant,
}

/// Process-local result cache with lazy time-based expiry. Nothing sweeps
/// the map; stale entries are dropped when next read.
pub struct InMemoryResultCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl InMemoryResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }
}

impl Default for InMemoryResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, key: &CacheKey) -> Option<TranscriptionResult> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = entries
            .get(key)
            .map(|entry| entry.inserted_at.elapsed() < self.ttl)?;

        if fresh {
            entries.get(key).map(|entry| entry.result.clone())
        } else {
            entries.remove(key);
            tracing::debug!(cache_key = %key, "Evicted expired cache entry");
            None
        }
    }

    fn put(&self, key: CacheKey, result: TranscriptionResult) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn sample_keys(&self, limit: usize) -> Vec<CacheKey> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .take(limit)
            .cloned()
            .collect()
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}
