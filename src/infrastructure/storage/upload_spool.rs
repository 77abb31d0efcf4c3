use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;
const MAX_FILENAME_CHARS: usize = 64;

/// Streams inbound uploads to a scratch directory under a byte ceiling.
pub struct UploadSpool {
    dir: PathBuf,
    max_bytes: u64,
    chunk_size: usize,
}

#[derive(Debug, Clone)]
pub struct SpooledUpload {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub sha256: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File too large. Maximum size is {max_mb}MB")]
    TooLarge { max_mb: u64 },
    #[error("upload stream failed: {0}")]
    Stream(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl UploadSpool {
    pub fn new(dir: PathBuf, max_bytes: u64, chunk_size: usize) -> Result<Self, UploadError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            max_bytes,
            chunk_size: chunk_size.max(1),
        })
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Writes the stream to a fresh temp file. On any failure, including the
    /// ceiling being crossed, the partial file is removed before returning.
    pub async fn spool<S, E>(&self, filename: &str, stream: S) -> Result<SpooledUpload, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let path = self
            .dir
            .join(format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename)));

        match self.write(&path, stream).await {
            Ok((size_bytes, sha256)) => Ok(SpooledUpload {
                path,
                size_bytes,
                sha256,
            }),
            Err(e) => {
                self.discard(&path).await;
                Err(e)
            }
        }
    }

    async fn write<S, E>(&self, path: &Path, stream: S) -> Result<(u64, String), UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let mut stream = std::pin::pin!(stream);
        let mut file = tokio::fs::File::create(path).await?;
        let mut hasher = Sha256::new();
        let mut total: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| UploadError::Stream(e.to_string()))?;
            for piece in chunk.chunks(self.chunk_size) {
                total += piece.len() as u64;
                if total > self.max_bytes {
                    return Err(UploadError::TooLarge {
                        max_mb: self.max_bytes / (1024 * 1024),
                    });
                }
                hasher.update(piece);
                file.write_all(piece).await?;
            }
        }

        file.flush().await?;
        Ok((total, format!("{:x}", hasher.finalize())))
    }

    /// Best-effort removal; failures are logged, never returned.
    pub async fn discard(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::info!(file_path = %path.display(), "Cleaned up temporary file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                file_path = %path.display(),
                error = %e,
                "Failed to cleanup temp file"
            ),
        }
    }
}

/// Owns a spooled file for the rest of a request. Dropping the guard
/// schedules removal of the file, including when the request is cancelled.
pub struct SpoolGuard {
    spool: Arc<UploadSpool>,
    path: PathBuf,
}

impl SpoolGuard {
    pub fn new(spool: Arc<UploadSpool>, path: PathBuf) -> Self {
        Self { spool, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpoolGuard {
    fn drop(&mut self) {
        let path = std::mem::take(&mut self.path);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let spool = Arc::clone(&self.spool);
                handle.spawn(async move {
                    spool.discard(&path).await;
                });
            }
            Err(_) => {
                if let Err(e) = std::fs::remove_file(&path) {
                    if e.kind() != io::ErrorKind::NotFound {
                        tracing::warn!(
                            file_path = %path.display(),
                            error = %e,
                            "Failed to cleanup temp file"
                        );
                    }
                }
            }
        }
    }
}

fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_CHARS)
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
