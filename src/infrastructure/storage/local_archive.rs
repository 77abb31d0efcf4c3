use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, WriteMultipart};
use tokio_util::io::ReaderStream;

use crate::application::ports::{ArchiveError, AudioArchive, RetainedAudio};
use crate::domain::{FileId, StoragePath};

const COPY_CHUNK_BYTES: usize = 64 * 1024;
const MAX_PENDING_PARTS: usize = 2;

/// Retained uploads kept under `archive_dir`, one object per file id.
pub struct LocalAudioArchive {
    store: Arc<dyn ObjectStore>,
}

impl LocalAudioArchive {
    pub fn new(archive_dir: PathBuf) -> Result<Self, ArchiveError> {
        std::fs::create_dir_all(&archive_dir)?;
        let fs = LocalFileSystem::new_with_prefix(&archive_dir)
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        Ok(Self {
            store: Arc::new(fs),
        })
    }

    fn object_path(file_id: &FileId) -> ObjectPath {
        ObjectPath::from(StoragePath::for_file(file_id).as_str())
    }

    async fn copy_into(
        &self,
        location: &ObjectPath,
        source: &Path,
    ) -> Result<u64, ArchiveError> {
        let file = tokio::fs::File::open(source).await?;
        let upload = self
            .store
            .put_multipart(location)
            .await
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        let mut writer = WriteMultipart::new(upload);
        let mut chunks = ReaderStream::with_capacity(file, COPY_CHUNK_BYTES);
        let mut copied: u64 = 0;

        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    let _ = writer.abort().await;
                    return Err(ArchiveError::Io(e));
                }
            };
            if let Err(e) = writer.wait_for_capacity(MAX_PENDING_PARTS).await {
                let _ = writer.abort().await;
                return Err(ArchiveError::Write(e.to_string()));
            }
            writer.write(&chunk);
            copied += chunk.len() as u64;
        }

        writer
            .finish()
            .await
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        Ok(copied)
    }
}

#[async_trait::async_trait]
impl AudioArchive for LocalAudioArchive {
    async fn retain(&self, source: &Path) -> Result<RetainedAudio, ArchiveError> {
        let file_id = FileId::new();
        let location = Self::object_path(&file_id);
        let size_bytes = self.copy_into(&location, source).await?;

        tracing::debug!(object = %location, size_bytes, "Audio archived");
        Ok(RetainedAudio {
            file_id,
            size_bytes,
        })
    }

    async fn load(&self, file_id: &FileId) -> Result<Bytes, ArchiveError> {
        let location = Self::object_path(file_id);
        let object = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                ArchiveError::NotFound(file_id.as_uuid().to_string())
            }
            other => ArchiveError::Read(other.to_string()),
        })?;

        object
            .bytes()
            .await
            .map_err(|e| ArchiveError::Read(e.to_string()))
    }
}
