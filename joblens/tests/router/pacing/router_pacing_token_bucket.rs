use std::sync::Arc;
use std::time::Duration;

use joblens::{Joblens, Pacing};
use joblens_core::{Capability, ManualClock, list_markets};
use joblens_mock::DynamicMockConnector;

use crate::helpers::{DelayedConnector, scripted};

#[tokio::test(start_paused = true)]
async fn bucket_spaces_market_starts() {
    let (builder, controller, _) = scripted();
    let joblens = builder
        .market_call_gap(Duration::ZERO)
        .pacing(Pacing::TokenBucket {
            max_concurrency: 10,
            requests_per_second: 2.0,
            burst: 1,
        })
        .build()
        .unwrap();

    joblens.analytics("rust").await.unwrap();
    let mut starts: Vec<_> = controller
        .calls()
        .await
        .into_iter()
        .filter(|c| c.capability == Capability::Search)
        .map(|c| c.at)
        .collect();
    starts.sort();
    assert_eq!(starts.len(), 10);
    for pair in starts.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(499));
    }
}

#[tokio::test(start_paused = true)]
async fn bucket_charges_search_and_histogram_calls_alike() {
    let (builder, controller, _) = scripted();
    let joblens = builder
        .market_call_gap(Duration::ZERO)
        .pacing(Pacing::TokenBucket {
            max_concurrency: 10,
            requests_per_second: 2.0,
            burst: 1,
        })
        .build()
        .unwrap();

    let t0 = tokio::time::Instant::now();
    joblens.analytics("rust").await.unwrap();
    let mut starts: Vec<_> = controller.calls().await.into_iter().map(|c| c.at).collect();
    starts.sort();
    assert_eq!(starts.len(), 20);

    let first_second = starts
        .iter()
        .filter(|at| **at - t0 < Duration::from_secs(1))
        .count();
    assert!(first_second <= 3, "{first_second} calls in the first second");
    for pair in starts.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(499));
    }
}

#[tokio::test(start_paused = true)]
async fn manual_clock_does_not_stall_the_bucket() {
    let (builder, _, _) = scripted();
    let joblens = builder
        .clock(Arc::new(ManualClock::new()))
        .pacing(Pacing::TokenBucket {
            max_concurrency: 2,
            requests_per_second: 1.0,
            burst: 1,
        })
        .build()
        .unwrap();

    let report = tokio::time::timeout(Duration::from_secs(3600), joblens.analytics("rust"))
        .await
        .expect("report finishes while the manual clock stands still")
        .unwrap();
    assert_eq!(report.markets.len(), 10);
    assert!(report.warnings.is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_first_market_does_not_reorder_the_report() {
    let (inner, controller) = DynamicMockConnector::new_with_controller("dyn");
    let delayed = DelayedConnector::new(inner, &[("US", Duration::from_secs(3))]);
    let joblens = Joblens::builder()
        .with_connector(Arc::new(delayed))
        .market_call_gap(Duration::ZERO)
        .pacing(Pacing::TokenBucket {
            max_concurrency: 10,
            requests_per_second: 100.0,
            burst: 10,
        })
        .build()
        .unwrap();

    let report = joblens.analytics("rust").await.unwrap();
    let codes: Vec<&str> = report.markets.iter().map(|m| &*m.market.code).collect();
    let registry = list_markets();
    let expected: Vec<&str> = registry.iter().map(|m| &*m.code).collect();
    assert_eq!(codes, expected);

    // US finished last even though it started first
    let calls = controller.calls().await;
    let last_hist = calls
        .iter()
        .filter(|c| c.capability == Capability::Histogram)
        .max_by_key(|c| c.at)
        .unwrap();
    assert_eq!(last_hist.market, "US");
}

#[tokio::test(start_paused = true)]
async fn concurrency_cap_bounds_markets_in_flight() {
    let (inner, _) = DynamicMockConnector::new_with_controller("dyn");
    let every: Vec<(&str, Duration)> = ["US", "GB", "DE", "CA", "AU", "FR", "NL", "SG", "IN", "BR"]
        .into_iter()
        .map(|c| (c, Duration::from_secs(1)))
        .collect();
    let joblens = Joblens::builder()
        .with_connector(Arc::new(DelayedConnector::new(inner, &every)))
        .market_call_gap(Duration::ZERO)
        .pacing(Pacing::TokenBucket {
            max_concurrency: 2,
            requests_per_second: 1_000.0,
            burst: 10,
        })
        .build()
        .unwrap();

    let t0 = tokio::time::Instant::now();
    joblens.analytics("rust").await.unwrap();
    let elapsed = t0.elapsed();
    // 5 waves of 2 markets, each market 2s (search + histogram)
    assert!(elapsed >= Duration::from_secs(10), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(11), "{elapsed:?}");
}

#[tokio::test]
async fn invalid_token_bucket_is_rejected_at_build() {
    let (builder, _, _) = scripted();
    let err = builder
        .pacing(Pacing::TokenBucket {
            max_concurrency: 2,
            requests_per_second: 0.0,
            burst: 1,
        })
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, joblens::JoblensError::InvalidArg(_)));

    let (builder, _, _) = scripted();
    assert!(builder
        .pacing(Pacing::TokenBucket {
            max_concurrency: 0,
            requests_per_second: 1.0,
            burst: 1,
        })
        .build()
        .is_err());
}
