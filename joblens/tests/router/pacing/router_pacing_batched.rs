use std::time::Duration;

use joblens_core::{Capability, list_markets};
use joblens_mock::CallRecord;

use crate::helpers::scripted;

fn started(calls: &[CallRecord], capability: Capability, code: &str) -> tokio::time::Instant {
    calls
        .iter()
        .find(|c| c.capability == capability && c.market == code)
        .map(|c| c.at)
        .expect("call recorded")
}

#[tokio::test(start_paused = true)]
async fn default_pacing_spaces_calls_and_batches() {
    let (builder, controller, _) = scripted();
    let joblens = builder.build().unwrap();
    let t0 = tokio::time::Instant::now();

    joblens.analytics("rust").await.unwrap();
    let calls = controller.calls().await;

    let us_search = started(&calls, Capability::Search, "US");
    let gb_search = started(&calls, Capability::Search, "GB");
    let us_hist = started(&calls, Capability::Histogram, "US");
    let de_search = started(&calls, Capability::Search, "DE");
    let in_search = started(&calls, Capability::Search, "IN");

    // first batch starts together
    assert_eq!(us_search, gb_search);
    assert!(us_hist - us_search >= Duration::from_millis(300));
    assert!(de_search - us_search >= Duration::from_millis(1_500));
    assert!(in_search - us_search >= Duration::from_millis(6_000));
    // no pause after the last batch
    assert!(t0.elapsed() < Duration::from_millis(6_000 + 300 + 1_200));
}

#[tokio::test(start_paused = true)]
async fn custom_batches_follow_configuration() {
    let (builder, controller, _) = scripted();
    let joblens = builder
        .market_call_gap(Duration::ZERO)
        .pacing(joblens::Pacing::Batched {
            batch_size: 5,
            batch_delay: Duration::from_secs(1),
        })
        .build()
        .unwrap();

    joblens.analytics("rust").await.unwrap();
    let calls = controller.calls().await;
    let first = started(&calls, Capability::Search, "US");
    for (i, m) in list_markets().iter().enumerate() {
        let at = started(&calls, Capability::Search, &m.code);
        let expected = Duration::from_millis(if i < 5 { 0 } else { 1_000 });
        let offset = at - first;
        assert!(
            offset >= expected && offset < expected + Duration::from_millis(50),
            "{}: {offset:?}",
            m.code
        );
    }
}

#[tokio::test(start_paused = true)]
async fn fetch_markets_keeps_input_order() {
    let (builder, _, _) = scripted();
    let joblens = builder.build().unwrap();
    let mut markets = list_markets();
    markets.reverse();

    let outcomes = joblens.fetch_markets("rust", &markets).await.unwrap();
    let codes: Vec<&str> = outcomes.iter().map(|o| &*o.market().code).collect();
    let expected: Vec<&str> = markets.iter().map(|m| &*m.code).collect();
    assert_eq!(codes, expected);
    assert!(outcomes.iter().all(|o| !o.is_failed()));
}

#[tokio::test(start_paused = true)]
async fn fetch_market_reports_partial_failures_as_warnings() {
    let (builder, controller, _) = scripted();
    let joblens = builder.build().unwrap();
    controller
        .set_histogram_behavior(
            "CA",
            joblens_mock::MockBehavior::Fail(joblens_core::JoblensError::http("dyn", 500)),
        )
        .await;

    let ca = crate::helpers::market("CA");
    match joblens.fetch_market(&ca, "rust").await.unwrap() {
        joblens_core::MarketOutcome::Fetched(r) => {
            assert_eq!(r.listing_count, 300);
            assert!(r.histogram.is_empty());
            assert_eq!(r.warnings.len(), 1);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(joblens.fetch_market(&ca, " ").await.is_err());
}
