use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::application::ports::UpstreamError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_ELAPSED: Duration = Duration::from_secs(300);

/// Exponential backoff around a whole upstream operation.
///
/// Each attempt is bounded by whatever remains of `max_elapsed`, so the
/// ceiling holds even when an attempt is stuck polling.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            max_elapsed: DEFAULT_MAX_ELAPSED,
        }
    }
}

impl RetryPolicy {
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, UpstreamError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let started = Instant::now();
        let mut backoff = self.initial_backoff;
        let mut attempt: u32 = 1;

        loop {
            let remaining = self.max_elapsed.saturating_sub(started.elapsed());
            let outcome = match tokio::time::timeout(remaining, operation(attempt)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(UpstreamError::TimedOut(self.max_elapsed.as_secs())),
            };

            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            let elapsed = started.elapsed();
            if attempt >= self.max_attempts.max(1) || elapsed + backoff >= self.max_elapsed {
                tracing::warn!(
                    attempt,
                    elapsed_secs = elapsed.as_secs_f64(),
                    error = %error,
                    "Giving up on upstream operation"
                );
                return Err(error);
            }

            tracing::warn!(
                attempt,
                delay_ms = backoff.as_millis() as u64,
                error = %error,
                "Upstream operation failed, backing off"
            );
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(self.max_backoff);
            attempt += 1;
        }
    }
}
