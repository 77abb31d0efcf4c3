use std::fmt;
use std::path::PathBuf;

/// Where the upstream service reads the audio from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    LocalFile {
        path: PathBuf,
        /// Hex SHA-256 of the file contents, when the caller computed one.
        content_digest: Option<String>,
    },
    Url(String),
}

impl AudioSource {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::LocalFile {
            path: path.into(),
            content_digest: None,
        }
    }

    pub fn local_with_digest(path: impl Into<PathBuf>, digest: impl Into<String>) -> Self {
        Self::LocalFile {
            path: path.into(),
            content_digest: Some(digest.into()),
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Stable string naming the audio for fingerprinting.
    pub fn identity(&self) -> String {
        match self {
            AudioSource::LocalFile {
                content_digest: Some(digest),
                ..
            } => format!("sha256:{}", digest),
            AudioSource::LocalFile { path, .. } => path.display().to_string(),
            AudioSource::Url(url) => url.clone(),
        }
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSource::LocalFile { path, .. } => write!(f, "{}", path.display()),
            AudioSource::Url(url) => f.write_str(url),
        }
    }
}
