use serde_json::Value;

use super::{JobId, JobStatus};

/// Snapshot of an upstream job as returned by a submit or status call.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    pub text: Option<String>,
    pub confidence: Option<f64>,
    pub audio_duration: Option<f64>,
    pub words: Value,
    pub utterances: Value,
    pub error: Option<String>,
}

impl JobRecord {
    pub fn pending(id: JobId, status: JobStatus) -> Self {
        Self {
            id,
            status,
            text: None,
            confidence: None,
            audio_duration: None,
            words: Value::Array(Vec::new()),
            utterances: Value::Array(Vec::new()),
            error: None,
        }
    }
}
