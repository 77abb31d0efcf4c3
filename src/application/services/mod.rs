mod job_runner;
mod performance_metrics;
mod retry_policy;
mod service_stats;
mod transcription_error;
mod transcription_service;

pub use job_runner::{DEFAULT_POLL_INTERVAL, JobPhase, TranscriptionJobRunner};
pub use performance_metrics::{MetricsSummary, PerformanceMetrics};
pub use retry_policy::{
    DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_ELAPSED,
    RetryPolicy,
};
pub use service_stats::{ServiceStats, ServiceStatsSnapshot};
pub use transcription_error::{ErrorKind, TranscriptionError};
pub use transcription_service::{TranscriptionRequest, TranscriptionService};
