use async_trait::async_trait;

use crate::domain::{AudioSource, JobId, JobRecord, TranscriptionOptions};

/// Remote job-based speech-to-text service.
#[async_trait]
pub trait UpstreamJobClient: Send + Sync {
    /// Submits the audio and returns the freshly created job.
    async fn submit(
        &self,
        source: &AudioSource,
        options: &TranscriptionOptions,
    ) -> Result<JobRecord, UpstreamError>;

    /// Fetches the latest state of a job. Safe to call repeatedly.
    async fn poll(&self, job_id: &JobId) -> Result<JobRecord, UpstreamError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
    #[error("audio source unreadable: {0}")]
    SourceUnreadable(String),
    #[error("transcription job {job_id} failed: {detail}")]
    JobFailed { job_id: JobId, detail: String },
    #[error("upstream interaction exceeded {0}s")]
    TimedOut(u64),
}

impl UpstreamError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UpstreamError::Rejected { status, .. } => Some(*status),
            UpstreamError::JobFailed { .. } => Some(400),
            _ => None,
        }
    }
}
