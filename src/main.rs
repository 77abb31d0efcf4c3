use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use scribeway::application::ports::AudioArchive;
use scribeway::application::services::{
    RetryPolicy, TranscriptionJobRunner, TranscriptionService,
};
use scribeway::infrastructure::cache::InMemoryResultCache;
use scribeway::infrastructure::observability::{TracingConfig, init_tracing, mask_secret};
use scribeway::infrastructure::progress::{InMemoryProgressStore, LoggingProgressNotifier};
use scribeway::infrastructure::storage::{LocalAudioArchive, UploadSpool};
use scribeway::infrastructure::upstream::AssemblyAiClient;
use scribeway::presentation::{AppState, ServiceInfo, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    let mut tracing_config = TracingConfig::default().with_level(&settings.logging.level);
    tracing_config.json_format |= settings.logging.enable_json;
    init_tracing(&tracing_config);

    tracing::info!(
        host = %settings.server.host,
        port = settings.server.port,
        environment = %settings.environment,
        api_key = %mask_secret(&settings.upstream.api_key),
        max_connections = settings.upstream.max_connections,
        "Starting audio transcription gateway"
    );

    let client = AssemblyAiClient::new(
        &settings.upstream.api_key,
        &settings.upstream.base_url,
        settings.upstream.max_connections,
        Duration::from_secs(settings.upstream.request_timeout_secs),
    )?;

    let cache = Arc::new(InMemoryResultCache::new(Duration::from_secs(
        settings.cache.ttl_secs,
    )));
    let progress_store = Arc::new(InMemoryProgressStore::new(Duration::from_secs(
        settings.progress.terminal_grace_secs,
    )));

    let runner = TranscriptionJobRunner::new(
        Arc::new(client),
        progress_store.clone(),
        Duration::from_secs(settings.upstream.poll_interval_secs),
    )
    .with_notifier(Arc::new(LoggingProgressNotifier));

    let retry_policy = RetryPolicy {
        max_attempts: settings.retry.max_attempts,
        initial_backoff: Duration::from_millis(settings.retry.initial_backoff_ms),
        max_backoff: Duration::from_secs(settings.retry.max_backoff_secs),
        max_elapsed: Duration::from_secs(settings.retry.max_elapsed_secs),
    };

    let transcription_service = Arc::new(TranscriptionService::new(
        runner,
        cache,
        progress_store,
        retry_policy,
        settings.transcription.allowed_speech_models.clone(),
    ));

    let upload_spool = Arc::new(UploadSpool::new(
        PathBuf::from(&settings.upload.temp_dir),
        settings.max_upload_bytes(),
        settings.upload.chunk_size_bytes,
    )?);

    let audio_archive: Option<Arc<dyn AudioArchive>> = if settings.upload.retain_uploads {
        let archive = LocalAudioArchive::new(PathBuf::from(&settings.upload.archive_dir))?;
        tracing::info!(archive_dir = %settings.upload.archive_dir, "Upload retention enabled");
        Some(Arc::new(archive))
    } else {
        None
    };

    let state = AppState {
        transcription_service,
        upload_spool,
        audio_archive,
        service_info: ServiceInfo::new(
            settings.transcription.default_speech_model.clone(),
            settings.upstream.max_connections,
        ),
    };

    let router = create_router(state);

    let listener =
        TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
