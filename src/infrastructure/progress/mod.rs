mod in_memory_progress_store;
mod logging_notifier;

pub use in_memory_progress_store::{DEFAULT_TERMINAL_GRACE, InMemoryProgressStore};
pub use logging_notifier::LoggingProgressNotifier;
