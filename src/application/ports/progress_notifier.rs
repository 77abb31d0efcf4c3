use async_trait::async_trait;

use crate::domain::{JobId, JobStatus};

/// Best-effort hook invoked on every poll tick.
#[async_trait]
pub trait ProgressNotifier: Send + Sync {
    async fn notify(
        &self,
        job_id: &JobId,
        progress: u8,
        status: JobStatus,
    ) -> Result<(), NotifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("notification delivery failed: {0}")]
    DeliveryFailed(String),
}
