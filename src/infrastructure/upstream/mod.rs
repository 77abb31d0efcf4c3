mod assemblyai_client;

pub use assemblyai_client::{
    AssemblyAiClient, DEFAULT_BASE_URL, DEFAULT_MAX_CONNECTIONS, DEFAULT_REQUEST_TIMEOUT,
    SpeakerOptions, TranscriptConfig, TranscriptResponse,
};
