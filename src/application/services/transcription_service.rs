use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::application::ports::{ProgressStore, ResultCache};
use crate::domain::{AudioSource, CacheKey, TranscriptionOptions, TranscriptionResult};

use super::{
    PerformanceMetrics, RetryPolicy, ServiceStats, TranscriptionError, TranscriptionJobRunner,
};

pub struct TranscriptionRequest {
    pub source: AudioSource,
    pub options: TranscriptionOptions,
    pub enable_caching: bool,
}

/// Cache lookup, validated submission with retry, and result caching for
/// one transcription request.
pub struct TranscriptionService {
    runner: TranscriptionJobRunner,
    cache: Arc<dyn ResultCache>,
    progress_store: Arc<dyn ProgressStore>,
    retry_policy: RetryPolicy,
    allowed_models: Vec<String>,
    stats: Arc<ServiceStats>,
}

impl TranscriptionService {
    pub fn new(
        runner: TranscriptionJobRunner,
        cache: Arc<dyn ResultCache>,
        progress_store: Arc<dyn ProgressStore>,
        retry_policy: RetryPolicy,
        allowed_models: Vec<String>,
    ) -> Self {
        Self {
            runner,
            cache,
            progress_store,
            retry_policy,
            allowed_models,
            stats: Arc::new(ServiceStats::default()),
        }
    }

    pub fn cache(&self) -> &Arc<dyn ResultCache> {
        &self.cache
    }

    pub fn progress_store(&self) -> &Arc<dyn ProgressStore> {
        &self.progress_store
    }

    pub fn stats(&self) -> &Arc<ServiceStats> {
        &self.stats
    }

    pub fn allowed_models(&self) -> &[String] {
        &self.allowed_models
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            source = %request.source,
            speech_model = %request.options.speech_model,
            caching = request.enable_caching
        )
    )]
    pub async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let mut metrics = PerformanceMetrics::start();

        match self.execute(request, &mut metrics).await {
            Ok(result) => {
                metrics.complete();
                self.stats.absorb(&metrics);
                let summary = metrics.summary();
                tracing::info!(
                    duration_seconds = summary.duration_seconds,
                    memory_peak_mb = summary.memory_peak_mb,
                    api_calls = summary.api_calls,
                    cache_hits = summary.cache_hits,
                    errors = summary.errors,
                    efficiency = summary.efficiency,
                    "Transcription completed"
                );
                Ok(result)
            }
            Err(e) => {
                metrics.errors += 1;
                metrics.complete();
                self.stats.absorb(&metrics);
                let summary = metrics.summary();
                tracing::error!(
                    error = %e,
                    status_code = e.status_code,
                    duration_seconds = summary.duration_seconds,
                    api_calls = summary.api_calls,
                    errors = summary.errors,
                    "Transcription failed"
                );
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        request: &TranscriptionRequest,
        metrics: &mut PerformanceMetrics,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let TranscriptionRequest {
            source,
            options,
            enable_caching,
        } = request;

        options.validate(&self.allowed_models)?;

        let descriptor = options.canonical_descriptor().map_err(|e| {
            TranscriptionError::internal(
                format!("Failed to compute cache key: {}", e),
                &e.to_string(),
            )
        })?;
        let cache_key = enable_caching.then(|| CacheKey::derive(source, &descriptor));

        if let Some(key) = &cache_key {
            if let Some(cached) = self.cache.get(key) {
                metrics.cache_hits += 1;
                tracing::info!(cache_key = %key, "Cache hit for transcription");
                return Ok(cached);
            }
        }

        tracing::info!(config = %descriptor, "Starting transcription");

        let attempts = AtomicU32::new(0);
        let attempts_ref = &attempts;
        let runner = &self.runner;
        let outcome = self
            .retry_policy
            .run(move |attempt| {
                attempts_ref.store(attempt, Ordering::Relaxed);
                tracing::debug!(attempt, "Submitting transcription attempt");
                runner.run(source, options)
            })
            .await;
        metrics.api_calls += attempts.load(Ordering::Relaxed);

        let result = outcome?;

        if let Some(key) = cache_key {
            self.cache.put(key, result.clone());
        }

        Ok(result)
    }
}
