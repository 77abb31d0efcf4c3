use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Body, Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::io::ReaderStream;

use crate::application::ports::{UpstreamError, UpstreamJobClient};
use crate::domain::{
    AudioSource, JobId, JobRecord, JobStatus, SpeakerExpectation, TranscriptionOptions,
};

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// Job client for an AssemblyAI-compatible `/v2` transcript API.
pub struct AssemblyAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AssemblyAiClient {
    pub fn new(
        api_key: &str,
        base_url: &str,
        max_connections: usize,
        request_timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .pool_max_idle_per_host(max_connections)
            .timeout(request_timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("client build: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn upload(&self, path: &Path) -> Result<String, UpstreamError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| UpstreamError::SourceUnreadable(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), "Uploading audio to upstream");

        let response = self
            .client
            .post(format!("{}/v2/upload", self.base_url))
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(format!("upload request: {e}")))?;

        let uploaded: UploadResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(format!("upload body: {e}")))?;

        Ok(uploaded.upload_url)
    }

    async fn resolve_audio_url(&self, source: &AudioSource) -> Result<String, UpstreamError> {
        match source {
            AudioSource::LocalFile { path, .. } => self.upload(path).await,
            AudioSource::Url(url) => Ok(url.clone()),
        }
    }
}

#[async_trait]
impl UpstreamJobClient for AssemblyAiClient {
    #[tracing::instrument(skip(self, options), fields(speech_model = %options.speech_model))]
    async fn submit(
        &self,
        source: &AudioSource,
        options: &TranscriptionOptions,
    ) -> Result<JobRecord, UpstreamError> {
        let audio_url = self.resolve_audio_url(source).await?;
        let config = TranscriptConfig::build(audio_url, options)?;

        let response = self
            .client
            .post(format!("{}/v2/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&config)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(format!("submit request: {e}")))?;

        let transcript: TranscriptResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(format!("submit body: {e}")))?;

        transcript.into_record()
    }

    async fn poll(&self, job_id: &JobId) -> Result<JobRecord, UpstreamError> {
        let response = self
            .client
            .get(format!("{}/v2/transcript/{}", self.base_url, job_id))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(format!("poll request: {e}")))?;

        let transcript: TranscriptResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(format!("poll body: {e}")))?;

        transcript.into_record()
    }
}

async fn ensure_success(response: Response) -> Result<Response, UpstreamError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    Err(UpstreamError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[derive(Debug, Serialize)]
pub struct TranscriptConfig {
    pub audio_url: String,
    pub speech_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    pub speaker_labels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers_expected: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_options: Option<SpeakerOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyterms_prompt: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct SpeakerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_speakers_expected: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speakers_expected: Option<u32>,
}

impl TranscriptConfig {
    pub fn build(audio_url: String, options: &TranscriptionOptions) -> Result<Self, UpstreamError> {
        let expectation = options
            .speaker_expectation()
            .map_err(|e| UpstreamError::Rejected {
                status: 400,
                message: e.to_string(),
            })?;

        let (speakers_expected, speaker_options) = match expectation {
            SpeakerExpectation::Unspecified => (None, None),
            SpeakerExpectation::Exact(count) => (Some(count), None),
            SpeakerExpectation::Range { min, max } => (
                None,
                Some(SpeakerOptions {
                    min_speakers_expected: min,
                    max_speakers_expected: max,
                }),
            ),
        };

        Ok(Self {
            audio_url,
            speech_model: options.speech_model.clone(),
            language_code: options.language_code.clone(),
            speaker_labels: options.speaker_labels,
            speakers_expected,
            speaker_options,
            keyterms_prompt: (!options.keyterms.is_empty()).then(|| options.keyterms.clone()),
        })
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptResponse {
    pub id: String,
    pub status: String,
    pub text: Option<String>,
    pub confidence: Option<f64>,
    pub audio_duration: Option<f64>,
    pub words: Option<Value>,
    pub utterances: Option<Value>,
    pub error: Option<String>,
}

impl TranscriptResponse {
    pub fn into_record(self) -> Result<JobRecord, UpstreamError> {
        let status: JobStatus = self.status.parse().map_err(UpstreamError::InvalidResponse)?;

        Ok(JobRecord {
            id: JobId::new(self.id),
            status,
            text: self.text,
            confidence: self.confidence,
            audio_duration: self.audio_duration,
            words: self.words.unwrap_or_else(|| Value::Array(Vec::new())),
            utterances: self.utterances.unwrap_or_else(|| Value::Array(Vec::new())),
            error: self.error,
        })
    }
}
