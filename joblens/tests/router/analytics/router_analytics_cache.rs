use std::sync::Arc;
use std::time::Duration;

use joblens_core::Capability;

use crate::helpers::scripted;

#[tokio::test(start_paused = true)]
async fn repeated_query_is_served_from_cache() {
    let (builder, controller, rates) = scripted();
    let joblens = builder.build().unwrap();

    let first = joblens.analytics("rust").await.unwrap();
    let calls = controller.calls().await.len();
    assert_eq!(calls, 20);
    assert_eq!(rates.call_count().await, 1);

    let second = joblens.analytics("rust").await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        serde_json::to_string(&*first).unwrap(),
        serde_json::to_string(&*second).unwrap()
    );
    assert_eq!(controller.calls().await.len(), calls);
    assert_eq!(rates.call_count().await, 1);
    assert_eq!(joblens.cached_reports(), 1);
}

#[tokio::test(start_paused = true)]
async fn cache_key_ignores_case_and_surrounding_whitespace() {
    let (builder, controller, _) = scripted();
    let joblens = builder.build().unwrap();

    let first = joblens.analytics("Rust Developer").await.unwrap();
    let second = joblens.analytics("  rust developer ").await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(controller.call_count(Capability::Search).await, 10);
    assert_eq!(first.query, "Rust Developer");
}

#[tokio::test(start_paused = true)]
async fn distinct_queries_do_not_share_entries() {
    let (builder, controller, rates) = scripted();
    let joblens = builder.build().unwrap();

    joblens.analytics("rust").await.unwrap();
    joblens.analytics("golang").await.unwrap();
    assert_eq!(controller.call_count(Capability::Search).await, 20);
    assert_eq!(joblens.cached_reports(), 2);
    // the rate table is shared between both runs
    assert_eq!(rates.call_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn report_expires_after_its_ttl() {
    let (builder, controller, _) = scripted();
    let joblens = builder.build().unwrap();

    let first = joblens.analytics("rust").await.unwrap();
    tokio::time::advance(Duration::from_secs(14 * 60)).await;
    let cached = joblens.analytics("rust").await.unwrap();
    assert!(Arc::ptr_eq(&first, &cached));
    assert_eq!(controller.call_count(Capability::Search).await, 10);

    tokio::time::advance(Duration::from_secs(2 * 60)).await;
    let fresh = joblens.analytics("rust").await.unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert_eq!(controller.call_count(Capability::Search).await, 20);
}

#[tokio::test(start_paused = true)]
async fn listing_cache_absorbs_calls_when_reports_are_not_cached() {
    let (builder, controller, _) = scripted();
    let joblens = builder
        .report_cache(joblens::CacheConfig {
            capacity: 200,
            ttl: Duration::ZERO,
        })
        .build()
        .unwrap();

    joblens.analytics("rust").await.unwrap();
    joblens.analytics("rust").await.unwrap();
    assert_eq!(joblens.cached_reports(), 0);
    assert_eq!(controller.call_count(Capability::Search).await, 10);
    assert_eq!(controller.call_count(Capability::Histogram).await, 10);
}

#[tokio::test(start_paused = true)]
async fn failed_calls_are_not_cached() {
    let (builder, controller, _) = scripted();
    let joblens = builder
        .report_cache(joblens::CacheConfig {
            capacity: 200,
            ttl: Duration::ZERO,
        })
        .build()
        .unwrap();
    controller
        .set_search_behavior(
            "GB",
            joblens_mock::MockBehavior::Fail(joblens_core::JoblensError::http("dyn", 503)),
        )
        .await;

    joblens.analytics("rust").await.unwrap();
    controller.clear_all_behaviors().await;
    let report = joblens.analytics("rust").await.unwrap();

    let gb = report.markets.iter().find(|m| m.market.code == "GB").unwrap();
    assert_eq!(gb.job_count, 800);
    assert!(report.warnings.is_empty());
}
