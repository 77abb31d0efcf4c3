use async_trait::async_trait;

use crate::application::ports::{NotifierError, ProgressNotifier};
use crate::domain::{JobId, JobStatus};

pub struct LoggingProgressNotifier;

#[async_trait]
impl ProgressNotifier for LoggingProgressNotifier {
    async fn notify(
        &self,
        job_id: &JobId,
        progress: u8,
        status: JobStatus,
    ) -> Result<(), NotifierError> {
        tracing::debug!(job_id = %job_id, progress, status = %status, "Job progress");
        Ok(())
    }
}
