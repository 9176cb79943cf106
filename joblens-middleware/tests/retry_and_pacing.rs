use std::sync::Arc;
use std::time::Duration;

use joblens_core::{Capability, JoblensError, RetryConfig, SearchRequest, find_market};
use joblens_middleware::{ConnectorBuilder, TokenBucket};
use joblens_mock::{DynamicMockConnector, MockBehavior};

fn retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        min_backoff_ms: 100,
        max_backoff_ms: 1_000,
        factor: 2,
        jitter_percent: 0,
    }
}

#[tokio::test(start_paused = true)]
async fn transient_failures_use_the_whole_budget() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_search_behavior("US", MockBehavior::Fail(JoblensError::http("dyn", 502)))
        .await;
    let wrapped = ConnectorBuilder::new(raw).with_retry(retry(3)).build();
    let us = find_market("US").unwrap();
    let err = wrapped
        .as_search_provider()
        .unwrap()
        .search(&us, &SearchRequest::new("rust", 50).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err, JoblensError::http("dyn", 502));
    assert_eq!(controller.call_count(Capability::Search).await, 3);
}

#[tokio::test(start_paused = true)]
async fn client_errors_fail_fast() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_histogram_behavior("US", MockBehavior::Fail(JoblensError::http("dyn", 403)))
        .await;
    let wrapped = ConnectorBuilder::new(raw).with_retry(retry(3)).build();
    let us = find_market("US").unwrap();
    assert!(
        wrapped
            .as_histogram_provider()
            .unwrap()
            .histogram(&us, "rust")
            .await
            .is_err()
    );
    assert_eq!(controller.call_count(Capability::Histogram).await, 1);
}

#[tokio::test(start_paused = true)]
async fn rate_limited_calls_are_spaced_by_refill() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("dyn");
    let bucket = Arc::new(TokenBucket::new(2.0, 1).unwrap());
    let wrapped = ConnectorBuilder::new(raw).with_rate_limit(bucket).build();
    let hp = wrapped.as_histogram_provider().unwrap();
    let us = find_market("US").unwrap();

    for _ in 0..3 {
        hp.histogram(&us, "rust").await.unwrap();
    }
    let calls = controller.calls().await;
    assert_eq!(calls.len(), 3);
    for pair in calls.windows(2) {
        assert!(pair[1].at - pair[0].at >= Duration::from_millis(500));
    }
}

#[tokio::test(start_paused = true)]
async fn each_attempt_gets_its_own_deadline() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller.set_search_behavior("US", MockBehavior::Hang).await;
    let wrapped = ConnectorBuilder::new(raw)
        .with_retry(retry(3))
        .with_timeout(Duration::from_secs(2))
        .build();
    let us = find_market("US").unwrap();

    let t0 = tokio::time::Instant::now();
    let err = wrapped
        .as_search_provider()
        .unwrap()
        .search(&us, &SearchRequest::new("rust", 50).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, JoblensError::ProviderTimeout { ref capability, .. } if capability == "search"));
    assert_eq!(controller.call_count(Capability::Search).await, 3);
    // three 2s deadlines plus 100ms and 200ms of backoff
    assert!(t0.elapsed() >= Duration::from_millis(6_300));
    assert!(t0.elapsed() < Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn retries_take_a_token_per_attempt() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_search_behavior("US", MockBehavior::Fail(JoblensError::http("dyn", 503)))
        .await;
    let bucket = Arc::new(TokenBucket::new(1.0, 1).unwrap());
    let wrapped = ConnectorBuilder::new(raw)
        .with_retry(retry(3))
        .with_rate_limit(bucket)
        .build();
    let us = find_market("US").unwrap();

    let _ = wrapped
        .as_search_provider()
        .unwrap()
        .search(&us, &SearchRequest::new("rust", 50).unwrap())
        .await;
    let calls = controller.calls().await;
    assert_eq!(calls.len(), 3);
    for pair in calls.windows(2) {
        assert!(pair[1].at - pair[0].at >= Duration::from_millis(999));
    }
}
