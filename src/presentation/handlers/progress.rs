use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::domain::JobId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ProgressResponse {
    pub progress: u8,
    pub timestamp: String,
    pub status: String,
}

pub async fn progress_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Json<ProgressResponse> {
    let entry = state
        .transcription_service
        .progress_store()
        .read(&JobId::new(job_id));

    Json(ProgressResponse {
        progress: entry.progress,
        timestamp: entry.timestamp.to_rfc3339(),
        status: entry
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    })
}
