use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;
use uuid::Uuid;

use crate::application::ports::ArchiveError;
use crate::domain::FileId;
use crate::presentation::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn audio_handler(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&file_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid file ID: {}", file_id) })),
            )
                .into_response();
        }
    };

    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Audio file not found: {}", file_id) })),
        )
            .into_response()
    };

    let Some(archive) = &state.audio_archive else {
        return not_found();
    };

    match archive.load(&FileId::from_uuid(uuid)).await {
        Ok(data) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            data,
        )
            .into_response(),
        Err(ArchiveError::NotFound(_)) => not_found(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read archived audio");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to read audio: {}", e) })),
            )
                .into_response()
        }
    }
}
