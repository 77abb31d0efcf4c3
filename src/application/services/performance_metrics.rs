use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Per-operation counters. Created at operation start, finalized once.
#[derive(Debug)]
pub struct PerformanceMetrics {
    started_at: Instant,
    finished_at: Option<Instant>,
    memory_mb: f64,
    pub api_calls: u32,
    pub cache_hits: u32,
    pub errors: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub duration_seconds: f64,
    pub memory_peak_mb: f64,
    pub api_calls: u32,
    pub cache_hits: u32,
    pub errors: u32,
    pub efficiency: f64,
}

impl PerformanceMetrics {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
            finished_at: None,
            memory_mb: 0.0,
            api_calls: 0,
            cache_hits: 0,
            errors: 0,
        }
    }

    /// Stamps the end time and memory snapshot. Later calls are no-ops.
    pub fn complete(&mut self) {
        if self.finished_at.is_some() {
            return;
        }
        self.finished_at = Some(Instant::now());
        self.memory_mb = memory_stats::memory_stats()
            .map(|usage| usage.physical_mem as f64 / BYTES_PER_MB)
            .unwrap_or(0.0);
    }

    pub fn is_complete(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn duration(&self) -> Duration {
        self.finished_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.started_at)
    }

    pub fn summary(&self) -> MetricsSummary {
        let efficiency = if self.api_calls > 0 {
            self.cache_hits as f64 / self.api_calls as f64
        } else {
            0.0
        };
        MetricsSummary {
            duration_seconds: self.duration().as_secs_f64(),
            memory_peak_mb: self.memory_mb,
            api_calls: self.api_calls,
            cache_hits: self.cache_hits,
            errors: self.errors,
            efficiency,
        }
    }
}
