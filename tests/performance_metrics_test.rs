use std::time::Duration;

use scribeway::application::services::{PerformanceMetrics, ServiceStats};

#[tokio::test(start_paused = true)]
async fn given_completed_metrics_when_time_passes_then_duration_is_frozen() {
    let mut metrics = PerformanceMetrics::start();
    tokio::time::advance(Duration::from_secs(3)).await;
    metrics.complete();
    tokio::time::advance(Duration::from_secs(10)).await;
    metrics.complete();

    assert!(metrics.is_complete());
    assert_eq!(metrics.duration(), Duration::from_secs(3));
}

#[test]
fn given_cache_hits_and_api_calls_when_summarizing_then_efficiency_is_their_ratio() {
    let mut metrics = PerformanceMetrics::start();
    metrics.api_calls = 4;
    metrics.cache_hits = 2;

    assert_eq!(metrics.summary().efficiency, 0.5);
}

#[test]
fn given_no_api_calls_when_summarizing_then_efficiency_is_zero() {
    let mut metrics = PerformanceMetrics::start();
    metrics.cache_hits = 1;

    assert_eq!(metrics.summary().efficiency, 0.0);
}

#[test]
fn given_finalized_metrics_when_absorbing_then_service_totals_accumulate() {
    let stats = ServiceStats::default();
    let mut first = PerformanceMetrics::start();
    first.api_calls = 2;
    first.errors = 1;
    let mut second = PerformanceMetrics::start();
    second.cache_hits = 1;

    stats.absorb(&first);
    stats.absorb(&second);

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.requests, 2);
    assert_eq!(snapshot.api_calls, 2);
    assert_eq!(snapshot.cache_hits, 1);
    assert_eq!(snapshot.errors, 1);
}
