mod local_archive;
mod upload_spool;

pub use local_archive::LocalAudioArchive;
pub use upload_spool::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MAX_UPLOAD_BYTES, SpoolGuard, SpooledUpload, UploadError,
    UploadSpool,
};
