use std::time::Duration;

use joblens::RetryConfig;
use joblens_core::{Capability, JoblensError};
use joblens_mock::MockBehavior;

use crate::helpers::scripted;

fn scoped_to<'a>(warnings: &'a [JoblensError], code: &str) -> Vec<&'a JoblensError> {
    warnings
        .iter()
        .filter_map(|w| match w {
            JoblensError::Market { market, error } if market == code => Some(&**error),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn failed_search_zeroes_listings_but_keeps_histogram() {
    let (builder, controller, _) = scripted();
    let joblens = builder.build().unwrap();
    controller
        .set_search_behavior("GB", MockBehavior::Fail(JoblensError::http("dyn", 500)))
        .await;

    let report = joblens.analytics("rust").await.unwrap();
    let gb = report.markets.iter().find(|m| m.market.code == "GB").unwrap();
    assert_eq!(gb.job_count, 0);
    assert_eq!(gb.total_results, 0);
    assert!(gb.descriptions.is_empty());
    // (30000 + 2 * 60000 + 90000) / 4
    assert_eq!(gb.salary.local_average, Some(60_000));
    assert_eq!(gb.salary.base_average, Some(75_000));

    assert_eq!(report.total_listings, 4_400 - 800);
    assert!(report.demand_ranking.iter().all(|d| d.code != "GB"));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(
        scoped_to(&report.warnings, "GB"),
        [&JoblensError::http("dyn", 500)]
    );
}

#[tokio::test(start_paused = true)]
async fn market_with_both_calls_failing_is_zero_filled() {
    let (builder, controller, _) = scripted();
    let joblens = builder.build().unwrap();
    controller
        .set_search_behavior("DE", MockBehavior::Fail(JoblensError::http("dyn", 502)))
        .await;
    controller
        .set_histogram_behavior("DE", MockBehavior::Fail(JoblensError::http("dyn", 502)))
        .await;

    let report = joblens.analytics("rust").await.unwrap();
    let de = report.markets.iter().find(|m| m.market.code == "DE").unwrap();
    assert_eq!(de.job_count, 0);
    assert_eq!(de.salary.local_average, None);
    assert_eq!(de.salary.base_average, None);
    assert!(de.histogram.is_empty());
    assert!(report.salary_ranking.iter().all(|s| s.code != "DE"));
    assert_eq!(report.markets.len(), 10);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(
        &report.warnings[0],
        JoblensError::AllProvidersFailed(inner) if inner.len() == 2
    ));
}

#[tokio::test(start_paused = true)]
async fn every_market_failing_still_yields_a_report() {
    let (builder, controller, _) = scripted();
    let joblens = builder.build().unwrap();
    for m in joblens.markets() {
        controller
            .set_search_behavior(&m.code, MockBehavior::Fail(JoblensError::http("dyn", 503)))
            .await;
        controller
            .set_histogram_behavior(&m.code, MockBehavior::Fail(JoblensError::http("dyn", 503)))
            .await;
    }

    let report = joblens.analytics("rust").await.unwrap();
    assert_eq!(report.markets.len(), 10);
    assert_eq!(report.total_listings, 0);
    assert_eq!(report.total_sampled, 0);
    assert!(report.demand_ranking.is_empty());
    assert!(report.salary_ranking.is_empty());
    assert!(report.top_skills.is_empty());
    let d = report.job_type_distribution;
    assert_eq!((d.remote_pct, d.hybrid_pct, d.onsite_pct), (0, 30, 70));
    assert_eq!(report.warnings.len(), 10);
}

#[tokio::test(start_paused = true)]
async fn hanging_call_becomes_a_timeout_warning() {
    let (builder, controller, _) = scripted();
    let joblens = builder
        .provider_timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    controller.set_search_behavior("US", MockBehavior::Hang).await;

    let report = joblens.analytics("rust").await.unwrap();
    let us = &report.markets[0];
    assert_eq!(us.job_count, 0);
    assert_eq!(us.salary.local_average, Some(120_000));
    let scoped = scoped_to(&report.warnings, "US");
    assert_eq!(scoped.len(), 1);
    assert!(matches!(
        scoped[0],
        JoblensError::ProviderTimeout { capability, .. } if capability == "search"
    ));
}

#[tokio::test(start_paused = true)]
async fn blank_query_is_rejected_without_upstream_calls() {
    let (builder, controller, rates) = scripted();
    let joblens = builder.build().unwrap();

    for q in ["", "   ", "\t\n"] {
        let err = joblens.analytics(q).await.unwrap_err();
        assert!(matches!(err, JoblensError::InvalidArg(_)));
    }
    assert!(controller.calls().await.is_empty());
    assert_eq!(rates.call_count().await, 0);
    assert_eq!(joblens.cached_reports(), 0);
}

#[tokio::test(start_paused = true)]
async fn unavailable_rates_fall_back_to_local_amounts() {
    let (builder, _, rates) = scripted();
    let joblens = builder.build().unwrap();
    rates
        .set_behavior(MockBehavior::Fail(JoblensError::http("rates", 503)))
        .await;

    let report = joblens.analytics("rust").await.unwrap();
    let gb = report.markets.iter().find(|m| m.market.code == "GB").unwrap();
    assert_eq!(gb.salary.local_average, Some(60_000));
    assert_eq!(gb.salary.base_average, Some(60_000));
    let inr = report.markets.iter().find(|m| m.market.code == "IN").unwrap();
    assert_eq!(inr.salary.base_average, Some(1_500_000));
    assert_eq!(report.salary_ranking[0].code, "IN");
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried() {
    let (builder, controller, _) = scripted();
    let joblens = builder
        .retry(RetryConfig {
            max_attempts: 3,
            min_backoff_ms: 10,
            max_backoff_ms: 100,
            factor: 2,
            jitter_percent: 0,
        })
        .build()
        .unwrap();
    controller
        .set_search_behavior("US", MockBehavior::Fail(JoblensError::http("dyn", 503)))
        .await;
    controller
        .set_search_behavior("GB", MockBehavior::Fail(JoblensError::http("dyn", 400)))
        .await;

    let report = joblens.analytics("rust").await.unwrap();
    let searches = |code: &'static str| {
        let controller = controller.clone();
        async move {
            controller
                .calls()
                .await
                .into_iter()
                .filter(|c| c.capability == Capability::Search && c.market == code)
                .count()
        }
    };
    assert_eq!(searches("US").await, 3);
    assert_eq!(searches("GB").await, 1);
    assert_eq!(searches("DE").await, 1);
    assert_eq!(report.warnings.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn hung_attempts_time_out_individually_and_are_retried() {
    let (builder, controller, _) = scripted();
    let joblens = builder
        .provider_timeout(Duration::from_secs(2))
        .retry(RetryConfig {
            max_attempts: 3,
            min_backoff_ms: 10,
            max_backoff_ms: 100,
            factor: 2,
            jitter_percent: 0,
        })
        .build()
        .unwrap();
    controller.set_search_behavior("US", MockBehavior::Hang).await;

    let report = joblens.analytics("rust").await.unwrap();
    let us_searches = controller
        .calls()
        .await
        .into_iter()
        .filter(|c| c.capability == Capability::Search && c.market == "US")
        .count();
    assert_eq!(us_searches, 3);

    let scoped = scoped_to(&report.warnings, "US");
    assert_eq!(scoped.len(), 1);
    assert!(matches!(
        scoped[0],
        JoblensError::ProviderTimeout { capability, .. } if capability == "search"
    ));
    assert_eq!(report.markets[0].salary.local_average, Some(120_000));
}
