//! Folds per-market outcomes into one `AnalyticsReport`.

use chrono::{DateTime, Utc};
use joblens_core::salary::normalize;
use joblens_core::skills::top_skills;
use joblens_core::{
    AnalyticsReport, DemandEntry, JobTypeDistribution, MarketFetchResult, MarketOutcome,
    MarketReport, RateTable, SalaryEntry, percent,
};

/// Share of non-remote postings estimated to be hybrid.
const HYBRID_SHARE: f64 = 0.3;

/// Knobs the reducer needs from the orchestrator configuration.
#[derive(Debug, Clone)]
pub struct ReduceOptions {
    /// Currency salary rankings are expressed in.
    pub base_currency: String,
    /// Number of skills kept in the ranking.
    pub top_skills: usize,
    /// Report timestamp.
    pub generated_at: DateTime<Utc>,
}

/// Remote / hybrid / on-site split; always sums to 100.
#[must_use]
pub fn job_type_distribution(remote: u64, sampled: u64) -> JobTypeDistribution {
    let remote_pct = percent(remote, sampled).min(100);
    let non_remote = 100 - remote_pct;
    let hybrid_pct = (f64::from(non_remote) * HYBRID_SHARE).round() as u32;
    JobTypeDistribution {
        remote_pct,
        hybrid_pct,
        onsite_pct: non_remote - hybrid_pct,
    }
}

fn market_report(r: &MarketFetchResult, rates: &RateTable, base: &str) -> MarketReport {
    MarketReport {
        market: r.market.clone(),
        job_count: r.listing_count,
        salary: normalize(r, rates, base),
        remote_count: r.sampled_remote_count,
        remote_percent: percent(r.sampled_remote_count, r.sampled_total),
        total_results: r.sampled_total,
        histogram: r.histogram.clone(),
        descriptions: r.sample_descriptions.clone(),
    }
}

/// Build the cross-market report for `query`.
///
/// `Failed` outcomes contribute an all-zero market entry and a warning.
#[must_use]
pub fn reduce(
    query: &str,
    outcomes: &[MarketOutcome],
    rates: &RateTable,
    opts: &ReduceOptions,
) -> AnalyticsReport {
    let mut warnings = Vec::new();
    let mut markets = Vec::with_capacity(outcomes.len());
    let mut remote_total = 0_u64;

    for outcome in outcomes {
        match outcome {
            MarketOutcome::Fetched(r) => {
                warnings.extend(r.warnings.iter().cloned());
                remote_total += r.sampled_remote_count;
                markets.push(market_report(r, rates, &opts.base_currency));
            }
            MarketOutcome::Failed { market, reason } => {
                warnings.push(reason.clone());
                let empty = MarketFetchResult::empty(market.clone());
                markets.push(market_report(&empty, rates, &opts.base_currency));
            }
        }
    }

    let total_listings = markets.iter().map(|m| m.job_count).sum();
    let total_sampled: u64 = markets.iter().map(|m| m.total_results).sum();

    let mut demand_ranking: Vec<DemandEntry> = markets
        .iter()
        .filter(|m| m.job_count > 0)
        .map(|m| DemandEntry {
            code: m.market.code.to_string(),
            name: m.market.name.to_string(),
            flag: m.market.flag.to_string(),
            count: m.job_count,
        })
        .collect();
    // stable: ties keep report order
    demand_ranking.sort_by(|a, b| b.count.cmp(&a.count));

    let mut salary_ranking: Vec<SalaryEntry> = markets
        .iter()
        .filter_map(|m| {
            m.salary.base_average.map(|salary| SalaryEntry {
                code: m.market.code.to_string(),
                name: m.market.name.to_string(),
                flag: m.market.flag.to_string(),
                salary,
            })
        })
        .collect();
    salary_ranking.sort_by(|a, b| b.salary.cmp(&a.salary));

    let samples = markets.iter().flat_map(|m| m.descriptions.iter());
    let top_skills = top_skills(samples, total_sampled, opts.top_skills);

    AnalyticsReport {
        query: query.to_string(),
        total_listings,
        total_sampled,
        base_currency: opts.base_currency.clone(),
        generated_at: opts.generated_at,
        markets,
        demand_ranking,
        salary_ranking,
        job_type_distribution: job_type_distribution(remote_total, total_sampled),
        top_skills,
        warnings,
    }
}
