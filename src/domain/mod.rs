mod audio_source;
mod cache_key;
mod file_id;
mod job_id;
mod job_record;
mod job_status;
mod progress;
mod storage_path;
mod transcription_options;
mod transcription_result;

pub use audio_source::AudioSource;
pub use cache_key::CacheKey;
pub use file_id::FileId;
pub use job_id::JobId;
pub use job_record::JobRecord;
pub use job_status::JobStatus;
pub use progress::ProgressEntry;
pub use storage_path::StoragePath;
pub use transcription_options::{
    DEFAULT_LANGUAGE_CODE, OptionsError, SpeakerExpectation, TranscriptionOptions, parse_keyterms,
};
pub use transcription_result::TranscriptionResult;
