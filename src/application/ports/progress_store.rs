use crate::domain::{JobId, JobStatus, ProgressEntry};

pub trait ProgressStore: Send + Sync {
    /// Stores the supplied percentage as-is; callers derive it from the status.
    fn record(&self, job_id: &JobId, progress: u8, status: JobStatus);

    /// Returns the last entry, or `ProgressEntry::unknown()` for unseen jobs.
    fn read(&self, job_id: &JobId) -> ProgressEntry;

    fn len(&self) -> usize;
}
