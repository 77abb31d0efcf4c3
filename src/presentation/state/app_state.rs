use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::AudioArchive;
use crate::application::services::TranscriptionService;
use crate::infrastructure::storage::UploadSpool;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub upload_spool: Arc<UploadSpool>,
    /// Present only when uploads are retained.
    pub audio_archive: Option<Arc<dyn AudioArchive>>,
    pub service_info: ServiceInfo,
}

/// Static facts about the running process reported by `/health` and `/metrics`.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub default_speech_model: String,
    pub max_connections: usize,
    pub started_at: Instant,
}

impl ServiceInfo {
    pub fn new(default_speech_model: impl Into<String>, max_connections: usize) -> Self {
        Self {
            name: "audio-transcription-api",
            version: env!("CARGO_PKG_VERSION"),
            default_speech_model: default_speech_model.into(),
            max_connections,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
