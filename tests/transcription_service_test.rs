mod common;

use std::sync::Arc;
use std::time::Duration;

use scribeway::application::ports::{ProgressStore, ResultCache};
use scribeway::application::services::{
    ErrorKind, TranscriptionJobRunner, TranscriptionRequest, TranscriptionService,
};
use scribeway::domain::{AudioSource, JobId, TranscriptionOptions};
use scribeway::infrastructure::cache::InMemoryResultCache;
use scribeway::infrastructure::progress::InMemoryProgressStore;

use common::{Script, ScriptedJobClient, allowed_models, fast_retry_policy};

fn build_service(client: Arc<ScriptedJobClient>) -> TranscriptionService {
    let cache = Arc::new(InMemoryResultCache::default());
    let progress = Arc::new(InMemoryProgressStore::default());
    let runner = TranscriptionJobRunner::new(client, progress.clone(), Duration::from_millis(5));
    TranscriptionService::new(runner, cache, progress, fast_retry_policy(), allowed_models())
}

fn request(model: &str, enable_caching: bool) -> TranscriptionRequest {
    TranscriptionRequest {
        source: AudioSource::local_with_digest("/tmp/clip.wav", "d1g3st"),
        options: TranscriptionOptions::new(model),
        enable_caching,
    }
}

#[tokio::test]
async fn given_unsupported_model_when_transcribing_then_rejects_without_upstream_call() {
    let client = Arc::new(ScriptedJobClient::completing());
    let service = build_service(client.clone());

    let error = service
        .transcribe(&request("whisper-xl", true))
        .await
        .unwrap_err();

    assert_eq!(error.kind, ErrorKind::ClientInput);
    assert_eq!(error.status_code, 400);
    assert!(error.message.contains("whisper-xl"));
    assert_eq!(client.submits(), 0);
    assert_eq!(service.stats().snapshot().errors, 1);
}

#[tokio::test]
async fn given_conflicting_speaker_hints_when_transcribing_then_rejects_without_upstream_call() {
    let client = Arc::new(ScriptedJobClient::completing());
    let service = build_service(client.clone());
    let mut req = request("slam-1", true);
    req.options.speakers_expected = Some(2);
    req.options.max_speakers_expected = Some(4);

    let error = service.transcribe(&req).await.unwrap_err();

    assert_eq!(error.status_code, 400);
    assert_eq!(client.submits(), 0);
}

#[tokio::test]
async fn given_cached_result_when_transcribing_again_then_returns_identical_payload_without_upstream_call() {
    let client = Arc::new(ScriptedJobClient::completing());
    let service = build_service(client.clone());

    let first = service.transcribe(&request("slam-1", true)).await.unwrap();
    let submits_after_first = client.submits();
    let second = service.transcribe(&request("slam-1", true)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(client.submits(), submits_after_first);
    assert_eq!(service.cache().len(), 1);

    let stats = service.stats().snapshot();
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.api_calls, 1);
}

#[tokio::test]
async fn given_caching_disabled_when_transcribing_twice_then_calls_upstream_each_time() {
    let client = Arc::new(ScriptedJobClient::completing());
    let service = build_service(client.clone());

    service.transcribe(&request("slam-1", false)).await.unwrap();
    service.transcribe(&request("slam-1", false)).await.unwrap();

    assert_eq!(client.submits(), 2);
    assert!(service.cache().is_empty());
}

#[tokio::test]
async fn given_different_options_when_transcribing_then_cache_is_not_shared() {
    let client = Arc::new(ScriptedJobClient::completing());
    let service = build_service(client.clone());

    service.transcribe(&request("slam-1", true)).await.unwrap();
    service.transcribe(&request("universal", true)).await.unwrap();

    assert_eq!(client.submits(), 2);
    assert_eq!(service.cache().len(), 2);
}

#[tokio::test]
async fn given_upstream_rejecting_every_submit_when_transcribing_then_retries_and_preserves_status() {
    let client = Arc::new(ScriptedJobClient::new(Script::RejectsSubmit { status: 503 }));
    let service = build_service(client.clone());

    let error = service
        .transcribe(&request("slam-1", true))
        .await
        .unwrap_err();

    assert_eq!(client.submits(), 3);
    assert_eq!(error.kind, ErrorKind::UpstreamRejection);
    assert_eq!(error.status_code, 503);
    assert!(error.message.starts_with("API error"));
    assert!(service.cache().is_empty());
    assert_eq!(service.stats().snapshot().api_calls, 3);
}

#[tokio::test]
async fn given_job_ending_in_error_when_transcribing_then_fails_with_transcript_id() {
    let client = Arc::new(ScriptedJobClient::new(Script::JobErrors {
        detail: "unsupported codec".to_string(),
    }));
    let service = build_service(client.clone());

    let error = service
        .transcribe(&request("slam-1", true))
        .await
        .unwrap_err();

    assert_eq!(error.kind, ErrorKind::TranscriptionFailed);
    assert_eq!(error.status_code, 400);
    assert_eq!(error.message, "Transcription failed: unsupported codec");
    assert_eq!(
        error.details.get("transcript_id").and_then(|v| v.as_str()),
        Some("job-3")
    );
    assert_eq!(client.submits(), 3);
}

#[tokio::test]
async fn given_successful_job_when_transcribing_then_progress_is_complete() {
    let client = Arc::new(ScriptedJobClient::completing());
    let service = build_service(client);

    let result = service.transcribe(&request("slam-1", true)).await.unwrap();

    let entry = service.progress_store().read(&result.id);
    assert_eq!(entry.progress, 100);
    assert_eq!(result.id, JobId::new("job-1"));
}

#[tokio::test]
async fn given_options_when_transcribing_then_upstream_receives_them_unchanged() {
    let client = Arc::new(ScriptedJobClient::completing());
    let service = build_service(client.clone());
    let mut req = request("universal", false);
    req.options.keyterms = vec!["kubernetes".to_string()];
    req.options.min_speakers_expected = Some(2);

    service.transcribe(&req).await.unwrap();

    assert_eq!(client.last_options(), Some(req.options.clone()));
}
