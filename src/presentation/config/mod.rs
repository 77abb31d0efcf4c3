mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    CacheSettings, LoggingSettings, ProgressSettings, RetrySettings, ServerSettings, Settings,
    SettingsError, TranscriptionSettings, UploadSettings, UpstreamSettings,
};
