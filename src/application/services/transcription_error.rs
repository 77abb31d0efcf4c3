use serde_json::{Map, Value};

use crate::application::ports::UpstreamError;
use crate::domain::OptionsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientInput,
    UpstreamRejection,
    TranscriptionFailed,
    Internal,
}

/// Failure surfaced to callers of the orchestrator: message, HTTP-style
/// status code and an opaque detail map.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TranscriptionError {
    pub kind: ErrorKind,
    pub message: String,
    pub status_code: u16,
    pub details: Map<String, Value>,
}

impl TranscriptionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code,
            details: Map::new(),
        }
    }

    pub fn client_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClientInput, message, 400)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClientInput, message, 413)
    }

    pub fn internal(message: impl Into<String>, original: &str) -> Self {
        Self::new(ErrorKind::Internal, message, 500).with_detail("original_error", original)
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

impl From<OptionsError> for TranscriptionError {
    fn from(e: OptionsError) -> Self {
        TranscriptionError::client_input(e.to_string())
    }
}

impl From<UpstreamError> for TranscriptionError {
    fn from(e: UpstreamError) -> Self {
        let original = e.to_string();
        match &e {
            UpstreamError::JobFailed { job_id, detail } => TranscriptionError::new(
                ErrorKind::TranscriptionFailed,
                format!("Transcription failed: {}", detail),
                e.status_code().unwrap_or(500),
            )
            .with_detail("transcript_id", job_id.as_str()),
            UpstreamError::SourceUnreadable(_) => {
                TranscriptionError::internal(format!("Transcription error: {}", original), &original)
            }
            _ => TranscriptionError::new(
                ErrorKind::UpstreamRejection,
                format!("API error: {}", original),
                e.status_code().unwrap_or(500),
            )
            .with_detail("original_error", original.as_str()),
        }
    }
}
