mod audio_archive;
mod progress_notifier;
mod progress_store;
mod result_cache;
mod upstream_job_client;

pub use audio_archive::{ArchiveError, AudioArchive, RetainedAudio};
pub use progress_notifier::{NotifierError, ProgressNotifier};
pub use progress_store::ProgressStore;
pub use result_cache::ResultCache;
pub use upstream_job_client::{UpstreamError, UpstreamJobClient};
