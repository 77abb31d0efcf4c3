#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use scribeway::application::ports::{
    NotifierError, ProgressNotifier, UpstreamError, UpstreamJobClient,
};
use scribeway::application::services::RetryPolicy;
use scribeway::domain::{AudioSource, JobId, JobRecord, JobStatus, TranscriptionOptions};

pub const TRANSCRIPT_TEXT: &str = "the quick brown fox";

pub fn allowed_models() -> Vec<String> {
    vec!["universal".to_string(), "slam-1".to_string()]
}

pub fn fast_retry_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(40),
        max_elapsed: Duration::from_secs(30),
    }
}

#[derive(Clone)]
pub enum Script {
    /// Queued on submit, `processing` for the given number of polls, then completed.
    Completes { polls_before_done: u32 },
    /// Every submit is rejected with the given status.
    RejectsSubmit { status: u16 },
    /// The job reaches the upstream `error` status on its first poll.
    JobErrors { detail: String },
}

/// Upstream stand-in that follows a fixed script and counts every call.
pub struct ScriptedJobClient {
    script: Script,
    submits: AtomicU32,
    polls: AtomicU32,
    polls_per_job: Mutex<HashMap<JobId, u32>>,
    last_options: Mutex<Option<TranscriptionOptions>>,
}

impl ScriptedJobClient {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            submits: AtomicU32::new(0),
            polls: AtomicU32::new(0),
            polls_per_job: Mutex::new(HashMap::new()),
            last_options: Mutex::new(None),
        }
    }

    pub fn completing() -> Self {
        Self::new(Script::Completes {
            polls_before_done: 1,
        })
    }

    pub fn submits(&self) -> u32 {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<TranscriptionOptions> {
        self.last_options.lock().unwrap().clone()
    }
}

pub fn completed_record(id: JobId) -> JobRecord {
    JobRecord {
        id,
        status: JobStatus::Completed,
        text: Some(TRANSCRIPT_TEXT.to_string()),
        confidence: Some(0.93),
        audio_duration: Some(12.5),
        words: json!([{"text": "the", "start": 0, "end": 120, "confidence": 0.99}]),
        utterances: json!([]),
        error: None,
    }
}

#[async_trait]
impl UpstreamJobClient for ScriptedJobClient {
    async fn submit(
        &self,
        _source: &AudioSource,
        options: &TranscriptionOptions,
    ) -> Result<JobRecord, UpstreamError> {
        let n = self.submits.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_options.lock().unwrap() = Some(options.clone());

        match &self.script {
            Script::RejectsSubmit { status } => Err(UpstreamError::Rejected {
                status: *status,
                message: "upstream unavailable".to_string(),
            }),
            _ => Ok(JobRecord::pending(
                JobId::new(format!("job-{}", n)),
                JobStatus::Queued,
            )),
        }
    }

    async fn poll(&self, job_id: &JobId) -> Result<JobRecord, UpstreamError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let seen = {
            let mut per_job = self.polls_per_job.lock().unwrap();
            let count = per_job.entry(job_id.clone()).or_insert(0);
            *count += 1;
            *count
        };

        match &self.script {
            Script::Completes { polls_before_done } if seen <= *polls_before_done => {
                Ok(JobRecord::pending(job_id.clone(), JobStatus::Processing))
            }
            Script::Completes { .. } => Ok(completed_record(job_id.clone())),
            Script::JobErrors { detail } => {
                let mut record = JobRecord::pending(job_id.clone(), JobStatus::Error);
                record.error = Some(detail.clone());
                Ok(record)
            }
            Script::RejectsSubmit { .. } => Err(UpstreamError::Transport(
                "poll without a job".to_string(),
            )),
        }
    }
}

/// Notifier whose delivery always fails.
pub struct FailingNotifier {
    pub calls: AtomicU32,
}

impl FailingNotifier {
    pub fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl ProgressNotifier for FailingNotifier {
    async fn notify(
        &self,
        _job_id: &JobId,
        _progress: u8,
        _status: JobStatus,
    ) -> Result<(), NotifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(NotifierError::DeliveryFailed("listener gone".to_string()))
    }
}
