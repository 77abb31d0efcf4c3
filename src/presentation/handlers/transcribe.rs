use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use super::error::ApiError;
use crate::application::services::{TranscriptionError, TranscriptionRequest};
use crate::domain::{AudioSource, FileId, TranscriptionOptions, parse_keyterms};
use crate::infrastructure::storage::{SpoolGuard, SpooledUpload, UploadError};
use crate::presentation::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

/// Text fields accepted alongside the uploaded file. Blank values count as absent.
#[derive(Debug, Default)]
struct TranscribeForm {
    speech_model: Option<String>,
    language_code: Option<String>,
    enable_caching: Option<bool>,
    speaker_labels: Option<bool>,
    speakers_expected: Option<u32>,
    min_speakers_expected: Option<u32>,
    max_speakers_expected: Option<u32>,
    keyterms_prompt: Option<String>,
}

impl TranscribeForm {
    fn set(&mut self, name: &str, raw: &str) -> Result<(), TranscriptionError> {
        let value = raw.trim();
        if value.is_empty() {
            return Ok(());
        }
        match name {
            "speech_model" => self.speech_model = Some(value.to_string()),
            "language_code" => self.language_code = Some(value.to_string()),
            "enable_caching" => self.enable_caching = Some(parse_flag(name, value)?),
            "speaker_labels" => self.speaker_labels = Some(parse_flag(name, value)?),
            "speakers_expected" => self.speakers_expected = Some(parse_count(name, value)?),
            "min_speakers_expected" => {
                self.min_speakers_expected = Some(parse_count(name, value)?)
            }
            "max_speakers_expected" => {
                self.max_speakers_expected = Some(parse_count(name, value)?)
            }
            "keyterms_prompt" => self.keyterms_prompt = Some(value.to_string()),
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
        Ok(())
    }

    fn into_options(self, default_model: &str) -> (TranscriptionOptions, bool) {
        let speech_model = self
            .speech_model
            .unwrap_or_else(|| default_model.to_string());
        let mut options = TranscriptionOptions::new(speech_model);
        options.language_code = self.language_code;
        options.speaker_labels = self.speaker_labels.unwrap_or(false);
        options.speakers_expected = self.speakers_expected;
        options.min_speakers_expected = self.min_speakers_expected;
        options.max_speakers_expected = self.max_speakers_expected;
        options.keyterms = self
            .keyterms_prompt
            .as_deref()
            .map(parse_keyterms)
            .unwrap_or_default();

        (options, self.enable_caching.unwrap_or(true))
    }
}

struct ReceivedUpload {
    spooled: SpooledUpload,
    guard: SpoolGuard,
    filename: String,
    content_type: String,
}

/// Accepts a multipart upload, transcribes it and returns the transcript with
/// request metadata. The work runs on its own task so a disconnecting client
/// does not cancel the upstream job; the spooled temp file is removed when
/// that task finishes, whatever the outcome.
#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();
    let work = tokio::spawn(
        process_upload(state, multipart, started).instrument(tracing::Span::current()),
    );

    match work.await {
        Ok(outcome) => outcome.map(Json).map_err(ApiError::from),
        Err(e) => {
            tracing::error!(error = %e, "Transcription task aborted");
            Err(ApiError::from(TranscriptionError::internal(
                format!("Transcription error: {}", e),
                &e.to_string(),
            )))
        }
    }
}

async fn process_upload(
    state: AppState,
    mut multipart: Multipart,
    started: Instant,
) -> Result<Value, TranscriptionError> {
    let mut form = TranscribeForm::default();
    let mut upload: Option<ReceivedUpload> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                return Err(TranscriptionError::client_input(format!(
                    "Failed to read multipart: {}",
                    e
                )));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        if name != FILE_FIELD {
            let text = field.text().await.map_err(|e| {
                TranscriptionError::client_input(format!("Invalid form field {}: {}", name, e))
            })?;
            form.set(&name, &text)?;
            continue;
        }

        if upload.is_some() {
            return Err(TranscriptionError::client_input(
                "Only one file may be uploaded per request",
            ));
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        tracing::debug!(
            filename = %filename,
            content_type = %content_type,
            "Receiving audio upload"
        );

        let spooled = state
            .upload_spool
            .spool(&filename, field)
            .await
            .map_err(upload_error)?;
        let guard = SpoolGuard::new(Arc::clone(&state.upload_spool), spooled.path.clone());

        upload = Some(ReceivedUpload {
            spooled,
            guard,
            filename,
            content_type,
        });
    }

    let Some(upload) = upload else {
        tracing::warn!("Transcription request with no file");
        return Err(TranscriptionError::client_input("No file provided"));
    };

    tracing::info!(
        filename = %upload.filename,
        size_bytes = upload.spooled.size_bytes,
        "Upload spooled"
    );

    let (options, enable_caching) =
        form.into_options(&state.service_info.default_speech_model);

    let request = TranscriptionRequest {
        source: AudioSource::local_with_digest(
            upload.guard.path().to_path_buf(),
            upload.spooled.sha256.clone(),
        ),
        options,
        enable_caching,
    };

    let result = state.transcription_service.transcribe(&request).await?;

    let file_id = retain_upload(&state, upload.guard.path()).await;

    let mut body = serde_json::to_value(&result).map_err(|e| {
        TranscriptionError::internal(format!("Transcription error: {}", e), &e.to_string())
    })?;

    if let Value::Object(map) = &mut body {
        map.insert(
            "processing_time".to_string(),
            Value::from(round2(started.elapsed().as_secs_f64())),
        );
        map.insert(
            "file_size_mb".to_string(),
            Value::from(round2(upload.spooled.size_bytes as f64 / (1024.0 * 1024.0))),
        );
        let info = FileInfo {
            filename: upload.filename,
            content_type: upload.content_type,
            size_bytes: upload.spooled.size_bytes,
            file_id: file_id.map(|id| id.as_uuid().to_string()),
        };
        map.insert(
            "file_info".to_string(),
            serde_json::to_value(info).unwrap_or(Value::Null),
        );
    }

    Ok(body)
}

/// Copies a successfully transcribed upload into the archive when retention
/// is enabled. Archive failures are logged and do not fail the request.
async fn retain_upload(state: &AppState, path: &Path) -> Option<FileId> {
    let archive = state.audio_archive.as_ref()?;

    match archive.retain(path).await {
        Ok(retained) => {
            tracing::info!(
                file_id = %retained.file_id.as_uuid(),
                bytes = retained.size_bytes,
                "Upload retained"
            );
            Some(retained.file_id)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to retain upload");
            None
        }
    }
}

fn upload_error(e: UploadError) -> TranscriptionError {
    match e {
        UploadError::TooLarge { .. } => TranscriptionError::payload_too_large(e.to_string()),
        UploadError::Stream(msg) => {
            TranscriptionError::client_input(format!("Failed to read upload: {}", msg))
        }
        UploadError::Io(io) => {
            TranscriptionError::internal(format!("Failed to store upload: {}", io), &io.to_string())
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, TranscriptionError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(TranscriptionError::client_input(format!(
            "Invalid value for {}: expected a boolean, got {}",
            name, value
        ))),
    }
}

fn parse_count(name: &str, value: &str) -> Result<u32, TranscriptionError> {
    value.parse().map_err(|_| {
        TranscriptionError::client_input(format!(
            "Invalid value for {}: expected a non-negative integer, got {}",
            name, value
        ))
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
