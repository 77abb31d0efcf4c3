use std::env;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::application::services::{
    DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_ELAPSED,
    DEFAULT_POLL_INTERVAL,
};
use crate::infrastructure::cache::DEFAULT_CACHE_TTL;
use crate::infrastructure::progress::DEFAULT_TERMINAL_GRACE;
use crate::infrastructure::storage::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_UPLOAD_BYTES};
use crate::infrastructure::upstream::{
    DEFAULT_BASE_URL, DEFAULT_MAX_CONNECTIONS, DEFAULT_REQUEST_TIMEOUT,
};

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Profile the settings were loaded for.
    #[serde(skip)]
    pub environment: Environment,
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub cache: CacheSettings,
    pub retry: RetrySettings,
    pub upload: UploadSettings,
    pub progress: ProgressSettings,
    pub transcription: TranscriptionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    pub api_key: String,
    pub base_url: String,
    pub max_connections: usize,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_secs: u64,
    pub max_elapsed_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub max_size_mb: u64,
    pub chunk_size_bytes: usize,
    pub temp_dir: String,
    pub retain_uploads: bool,
    pub archive_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressSettings {
    pub terminal_grace_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub default_speech_model: String,
    pub allowed_speech_models: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown environment `{0}`; expected local, test or prod")]
    UnknownEnvironment(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("upstream API key is missing; set APP_UPSTREAM__API_KEY or ASSEMBLYAI_API_KEY")]
    MissingApiKey,
    #[error("default speech model `{0}` is not in the allowed list")]
    UnknownDefaultModel(String),
}

impl Settings {
    /// Loads `.env`, then defaults, `appsettings.{Environment}` and `APP_*` variables.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        Self::load_for(Environment::from_env()?)
    }

    pub fn load_for(environment: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000_u64)?
            .set_default("upstream.api_key", "")?
            .set_default("upstream.base_url", DEFAULT_BASE_URL)?
            .set_default("upstream.max_connections", DEFAULT_MAX_CONNECTIONS as u64)?
            .set_default(
                "upstream.request_timeout_secs",
                DEFAULT_REQUEST_TIMEOUT.as_secs(),
            )?
            .set_default("upstream.poll_interval_secs", DEFAULT_POLL_INTERVAL.as_secs())?
            .set_default("cache.ttl_secs", DEFAULT_CACHE_TTL.as_secs())?
            .set_default("retry.max_attempts", DEFAULT_MAX_ATTEMPTS as u64)?
            .set_default(
                "retry.initial_backoff_ms",
                DEFAULT_INITIAL_BACKOFF.as_millis() as u64,
            )?
            .set_default("retry.max_backoff_secs", DEFAULT_MAX_BACKOFF.as_secs())?
            .set_default("retry.max_elapsed_secs", DEFAULT_MAX_ELAPSED.as_secs())?
            .set_default("upload.max_size_mb", DEFAULT_MAX_UPLOAD_BYTES / BYTES_PER_MB)?
            .set_default("upload.chunk_size_bytes", DEFAULT_CHUNK_SIZE as u64)?
            .set_default("upload.temp_dir", env::temp_dir().display().to_string())?
            .set_default("upload.retain_uploads", false)?
            .set_default("upload.archive_dir", "data/audio")?
            .set_default(
                "progress.terminal_grace_secs",
                DEFAULT_TERMINAL_GRACE.as_secs(),
            )?
            .set_default("transcription.default_speech_model", "slam-1")?
            .set_default(
                "transcription.allowed_speech_models",
                vec!["universal", "slam-1"],
            )?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)?;

        if let Ok(key) = env::var("ASSEMBLYAI_API_KEY") {
            builder = builder.set_default("upstream.api_key", key)?;
        }

        let configuration = builder
            .add_source(
                File::with_name(&environment.settings_file()).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("transcription.allowed_speech_models"),
            )
            .build()?;

        let mut settings: Settings = configuration.try_deserialize()?;
        settings.environment = environment;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.upstream.api_key.trim().is_empty() {
            return Err(SettingsError::MissingApiKey);
        }
        let default_model = &self.transcription.default_speech_model;
        if !self
            .transcription
            .allowed_speech_models
            .iter()
            .any(|m| m == default_model)
        {
            return Err(SettingsError::UnknownDefaultModel(default_model.clone()));
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.upload.max_size_mb * BYTES_PER_MB
    }
}
