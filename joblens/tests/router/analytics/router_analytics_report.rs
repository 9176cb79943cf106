use std::sync::Arc;
use std::time::Duration;

use joblens::Joblens;
use joblens_core::list_markets;
use joblens_mock::{MockConnector, MockRateProvider};

fn fixture_joblens() -> Joblens {
    Joblens::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .with_rate_provider(Arc::new(MockRateProvider))
        .market_call_gap(Duration::ZERO)
        .pacing(joblens::Pacing::Batched {
            batch_size: 10,
            batch_delay: Duration::ZERO,
        })
        .build()
        .unwrap()
}

#[tokio::test]
async fn report_covers_every_market_in_registry_order() {
    let report = fixture_joblens().analytics("rust").await.unwrap();
    let codes: Vec<_> = report.markets.iter().map(|m| m.market.code.clone()).collect();
    let expected: Vec<_> = list_markets().into_iter().map(|m| m.code).collect();
    assert_eq!(codes, expected);
    assert_eq!(report.query, "rust");
    assert_eq!(report.base_currency, "USD");
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn totals_are_sums_over_markets() {
    let report = fixture_joblens().analytics("rust").await.unwrap();
    assert_eq!(report.total_listings, 4_400);
    assert_eq!(
        report.total_listings,
        report.markets.iter().map(|m| m.job_count).sum::<u64>()
    );
    assert_eq!(report.total_sampled, 36);
}

#[tokio::test]
async fn demand_ranking_excludes_empty_markets() {
    let report = fixture_joblens().analytics("rust").await.unwrap();
    let codes: Vec<_> = report
        .demand_ranking
        .iter()
        .map(|d| d.code.as_str())
        .collect();
    assert_eq!(
        codes,
        ["US", "IN", "GB", "DE", "CA", "AU", "FR", "NL", "SG"]
    );
}

#[tokio::test]
async fn salaries_are_converted_into_base_currency() {
    let report = fixture_joblens().analytics("rust").await.unwrap();
    let gb = report.markets.iter().find(|m| m.market.code == "GB").unwrap();
    assert_eq!(gb.salary.local_average, Some(60_000));
    assert_eq!(gb.salary.base_average, Some(75_000));

    let ranking: Vec<_> = report
        .salary_ranking
        .iter()
        .map(|s| (s.code.as_str(), s.salary))
        .collect();
    assert_eq!(
        ranking,
        [
            ("US", 120_000),
            ("GB", 75_000),
            ("AU", 73_333),
            ("DE", 72_222),
            ("CA", 66_667),
            ("NL", 66_667),
            ("SG", 66_667),
            ("FR", 55_556),
            ("IN", 18_072),
        ]
    );
    let br = report.markets.iter().find(|m| m.market.code == "BR").unwrap();
    assert_eq!(br.salary.base_average, None);
}

#[tokio::test]
async fn remote_share_and_distribution() {
    let report = fixture_joblens().analytics("rust").await.unwrap();
    let us = &report.markets[0];
    assert_eq!(us.remote_count, 2);
    assert_eq!(us.remote_percent, 50);
    let d = report.job_type_distribution;
    assert_eq!((d.remote_pct, d.hybrid_pct, d.onsite_pct), (50, 15, 35));
}

#[tokio::test]
async fn top_skills_rank_by_posting_count() {
    let report = fixture_joblens().analytics("rust").await.unwrap();
    let names: Vec<_> = report.top_skills.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        ["Python", "Kubernetes", "Rust", "AWS", "Docker", "SQL", "PostgreSQL", "Git"]
    );
    assert_eq!(report.top_skills[0].count, 18);
    assert_eq!(report.top_skills[0].percent_of_sampled_listings, 50);
}

#[tokio::test]
async fn wire_shape_uses_camel_case_names() {
    let report = fixture_joblens().analytics("rust").await.unwrap();
    let json = serde_json::to_value(&*report).unwrap();
    assert_eq!(json["totalJobs"], 4_400);
    assert_eq!(json["countries"][1]["avgSalaryUSD"], 75_000);
    assert_eq!(json["countries"][1]["avgSalaryLocal"], 60_000);
    assert!(json["countries"][9]["avgSalaryUSD"].is_null());
    assert_eq!(json["jobTypeDistribution"]["remotePct"], 50);
    assert_eq!(json["warnings"], serde_json::json!([]));
}

#[tokio::test]
async fn narrower_market_list_is_honored() {
    let joblens = Joblens::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .markets(vec![
            joblens_core::find_market("DE").unwrap(),
            joblens_core::find_market("US").unwrap(),
        ])
        .market_call_gap(Duration::ZERO)
        .build()
        .unwrap();
    let report = joblens.analytics("rust").await.unwrap();
    let codes: Vec<_> = report.markets.iter().map(|m| &*m.market.code).collect::<Vec<&str>>();
    assert_eq!(codes, ["DE", "US"]);
    // no rate provider: base amounts fall back to local amounts
    assert_eq!(report.markets[0].salary.base_average, Some(65_000));
}
