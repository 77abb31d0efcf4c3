use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::application::services::ServiceStatsSnapshot;
use crate::presentation::state::AppState;

const SAMPLE_KEY_LIMIT: usize = 5;

#[derive(Serialize)]
pub struct MetricsResponse {
    pub cache: CacheMetrics,
    pub service: ServiceMetrics,
    pub transcriptions: ServiceStatsSnapshot,
}

#[derive(Serialize)]
pub struct CacheMetrics {
    pub size: usize,
    pub sample_keys: Vec<String>,
    pub ttl_seconds: u64,
}

#[derive(Serialize)]
pub struct ServiceMetrics {
    pub uptime_seconds: f64,
    pub version: String,
    pub max_connections: usize,
}

#[tracing::instrument(skip(state))]
pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsResponse> {
    let service = &state.transcription_service;
    let cache = service.cache();

    Json(MetricsResponse {
        cache: CacheMetrics {
            size: cache.len(),
            sample_keys: cache
                .sample_keys(SAMPLE_KEY_LIMIT)
                .into_iter()
                .map(|k| k.as_str().to_string())
                .collect(),
            ttl_seconds: cache.ttl().as_secs(),
        },
        service: ServiceMetrics {
            uptime_seconds: state.service_info.uptime_seconds(),
            version: state.service_info.version.to_string(),
            max_connections: state.service_info.max_connections,
        },
        transcriptions: service.stats().snapshot(),
    })
}
