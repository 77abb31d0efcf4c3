use chrono::{DateTime, Utc};
use serde::Serialize;

use super::JobStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEntry {
    pub progress: u8,
    pub timestamp: DateTime<Utc>,
    pub status: Option<JobStatus>,
}

impl ProgressEntry {
    pub fn new(progress: u8, status: JobStatus) -> Self {
        Self {
            progress,
            timestamp: Utc::now(),
            status: Some(status),
        }
    }

    /// Placeholder returned for jobs the store has never seen.
    pub fn unknown() -> Self {
        Self {
            progress: 0,
            timestamp: Utc::now(),
            status: None,
        }
    }
}
