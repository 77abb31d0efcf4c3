use std::io;
use std::path::Path;

use bytes::Bytes;

use crate::domain::FileId;

/// An upload copied into the archive.
#[derive(Debug, Clone)]
pub struct RetainedAudio {
    pub file_id: FileId,
    pub size_bytes: u64,
}

/// Long-lived copy of uploaded audio, addressable by generated file id.
#[async_trait::async_trait]
pub trait AudioArchive: Send + Sync {
    /// Copies a spooled upload under a fresh file id.
    async fn retain(&self, source: &Path) -> Result<RetainedAudio, ArchiveError>;

    async fn load(&self, file_id: &FileId) -> Result<Bytes, ArchiveError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archived audio not found: {0}")]
    NotFound(String),
    #[error("archive write failed: {0}")]
    Write(String),
    #[error("archive read failed: {0}")]
    Read(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
