use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::JobId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub confidence: Option<f64>,
    pub id: JobId,
    pub transcript_id: JobId,
    pub status: String,
    pub audio_duration: Option<f64>,
    pub words: Value,
    pub utterances: Value,
    pub speaker_labels_enabled: bool,
}
