mod audio;
mod error;
mod health;
mod metrics;
mod progress;
mod transcribe;

pub use audio::audio_handler;
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use progress::progress_handler;
pub use transcribe::transcribe_handler;
