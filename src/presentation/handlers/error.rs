use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::application::services::TranscriptionError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Map<String, Value>,
    pub timestamp: f64,
}

/// HTTP rendering of a [`TranscriptionError`], keeping its status code.
#[derive(Debug)]
pub struct ApiError(pub TranscriptionError);

impl From<TranscriptionError> for ApiError {
    fn from(e: TranscriptionError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.0.message,
            details: self.0.details,
            timestamp: unix_timestamp(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn unix_timestamp() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}
