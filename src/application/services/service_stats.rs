use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::PerformanceMetrics;

/// Process-wide totals folded in from finalized per-operation metrics.
#[derive(Debug, Default)]
pub struct ServiceStats {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    api_calls: AtomicU64,
    errors: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub api_calls: u64,
    pub errors: u64,
}

impl ServiceStats {
    pub fn absorb(&self, metrics: &PerformanceMetrics) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.cache_hits
            .fetch_add(metrics.cache_hits as u64, Ordering::Relaxed);
        self.api_calls
            .fetch_add(metrics.api_calls as u64, Ordering::Relaxed);
        self.errors
            .fetch_add(metrics.errors as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            api_calls: self.api_calls.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}
