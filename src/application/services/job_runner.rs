use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    ProgressNotifier, ProgressStore, UpstreamError, UpstreamJobClient,
};
use crate::domain::{
    AudioSource, JobId, JobRecord, JobStatus, TranscriptionOptions, TranscriptionResult,
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Where a single submit-and-poll attempt currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum JobPhase {
    Idle,
    Submitted(JobRecord),
    Polling(JobId),
    Completed(JobRecord),
    Failed { job_id: JobId, detail: String },
}

/// Drives one upstream job from submission to a terminal status.
pub struct TranscriptionJobRunner {
    client: Arc<dyn UpstreamJobClient>,
    progress_store: Arc<dyn ProgressStore>,
    notifier: Option<Arc<dyn ProgressNotifier>>,
    poll_interval: Duration,
}

impl TranscriptionJobRunner {
    pub fn new(
        client: Arc<dyn UpstreamJobClient>,
        progress_store: Arc<dyn ProgressStore>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            progress_store,
            notifier: None,
            poll_interval,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ProgressNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub async fn run(
        &self,
        source: &AudioSource,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult, UpstreamError> {
        let mut phase = JobPhase::Idle;

        loop {
            phase = match phase {
                JobPhase::Idle => {
                    let job = self.client.submit(source, options).await?;
                    tracing::info!(job_id = %job.id, status = %job.status, "Transcription job submitted");
                    self.progress_store.record(&job.id, 0, job.status);
                    JobPhase::Submitted(job)
                }
                JobPhase::Submitted(job) => {
                    if job.status.is_terminal() {
                        self.progress_store
                            .record(&job.id, job.status.progress_percent(), job.status);
                        settle(job)
                    } else {
                        JobPhase::Polling(job.id)
                    }
                }
                JobPhase::Polling(job_id) => {
                    tokio::time::sleep(self.poll_interval).await;
                    let job = self.client.poll(&job_id).await?;
                    let progress = job.status.progress_percent();
                    self.progress_store.record(&job.id, progress, job.status);
                    self.notify(&job.id, progress, job.status).await;

                    if job.status.is_terminal() {
                        settle(job)
                    } else {
                        JobPhase::Polling(job_id)
                    }
                }
                JobPhase::Completed(job) => {
                    tracing::debug!(job_id = %job.id, "Transcription job completed");
                    return Ok(assemble(job, options.speaker_labels));
                }
                JobPhase::Failed { job_id, detail } => {
                    tracing::warn!(job_id = %job_id, detail = %detail, "Transcription job failed upstream");
                    return Err(UpstreamError::JobFailed { job_id, detail });
                }
            };
        }
    }

    async fn notify(&self, job_id: &JobId, progress: u8, status: JobStatus) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        if let Err(e) = notifier.notify(job_id, progress, status).await {
            tracing::warn!(job_id = %job_id, error = %e, "Progress callback failed");
        }
    }
}

fn settle(job: JobRecord) -> JobPhase {
    match job.status {
        JobStatus::Error => JobPhase::Failed {
            detail: job
                .error
                .clone()
                .unwrap_or_else(|| "unknown upstream error".to_string()),
            job_id: job.id,
        },
        _ => JobPhase::Completed(job),
    }
}

fn assemble(job: JobRecord, speaker_labels: bool) -> TranscriptionResult {
    TranscriptionResult {
        text: job.text.unwrap_or_default(),
        confidence: job.confidence,
        id: job.id.clone(),
        transcript_id: job.id,
        status: JobStatus::Completed.as_str().to_string(),
        audio_duration: job.audio_duration,
        words: job.words,
        utterances: job.utterances,
        speaker_labels_enabled: speaker_labels,
    }
}
