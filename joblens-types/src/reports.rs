//! Report envelopes produced by the orchestrator.
//!
//! Field names serialize to the camelCase JSON shape consumed by the
//! presentation layer (`totalJobs`, `countries`, `avgSalaryUSD`, ...).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::JoblensError;
use crate::market::MarketDescriptor;

/// Title and body text of one sampled posting, kept for skill extraction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDescription {
    /// Posting title.
    pub title: String,
    /// Posting body text.
    pub description: String,
    /// Structured highlight lines (qualifications, responsibilities) when the
    /// upstream provides them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

/// Reconciled salary for one market, in local and base currency.
///
/// Values are rounded to whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalaryEstimate {
    /// Average salary in the market's own currency.
    #[serde(rename = "avgSalaryLocal")]
    pub local_average: Option<i64>,
    /// Average salary converted into the report's base currency.
    ///
    /// The wire name keeps the historical `USD` suffix even when a different
    /// base currency is configured; `AnalyticsReport::base_currency` is authoritative.
    #[serde(rename = "avgSalaryUSD")]
    pub base_average: Option<i64>,
}

/// Per-market slice of an analytics report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    /// Market the figures below belong to.
    #[serde(flatten)]
    pub market: MarketDescriptor,
    /// Total listings reported by the upstream (population, not sample size).
    pub job_count: u64,
    /// Salary estimate for the market.
    #[serde(flatten)]
    pub salary: SalaryEstimate,
    /// Sampled postings classified as remote.
    pub remote_count: u64,
    /// `remote_count` as a rounded percentage of `total_results`.
    pub remote_percent: u32,
    /// Size of the fetched sample.
    pub total_results: u64,
    /// Salary bucket → posting count, as returned by the upstream.
    pub histogram: BTreeMap<String, u64>,
    /// Bounded list of sampled postings.
    pub descriptions: Vec<SampleDescription>,
}

/// Entry of the listing-demand ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandEntry {
    /// Market code.
    pub code: String,
    /// Market name.
    pub name: String,
    /// Market flag glyph.
    pub flag: String,
    /// Total listings for the market.
    pub count: u64,
}

/// Entry of the base-currency salary ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryEntry {
    /// Market code.
    pub code: String,
    /// Market name.
    pub name: String,
    /// Market flag glyph.
    pub flag: String,
    /// Average salary in the base currency.
    pub salary: i64,
}

/// Estimated split of postings by work arrangement. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTypeDistribution {
    /// Share of sampled postings classified as remote.
    pub remote_pct: u32,
    /// Estimated hybrid share of the non-remote mass.
    pub hybrid_pct: u32,
    /// Estimated on-site share of the non-remote mass.
    pub onsite_pct: u32,
}

/// Frequency of one vocabulary skill across sampled postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCount {
    /// Skill name as spelled in the vocabulary.
    pub name: String,
    /// Number of sampled postings mentioning the skill.
    pub count: u64,
    /// `count` as a rounded percentage of all sampled postings.
    pub percent_of_sampled_listings: u32,
}

/// Point-in-time cross-market snapshot for one search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Search term as supplied by the caller.
    pub query: String,
    /// Sum of upstream listing totals across markets.
    #[serde(rename = "totalJobs")]
    pub total_listings: u64,
    /// Sum of sample sizes across markets.
    #[serde(rename = "totalResults")]
    pub total_sampled: u64,
    /// Currency salary rankings are expressed in.
    pub base_currency: String,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// Per-market figures in registry order.
    #[serde(rename = "countries")]
    pub markets: Vec<MarketReport>,
    /// Markets with listings, most listings first.
    pub demand_ranking: Vec<DemandEntry>,
    /// Markets with a salary estimate, highest first.
    pub salary_ranking: Vec<SalaryEntry>,
    /// Remote / hybrid / on-site estimate.
    pub job_type_distribution: JobTypeDistribution,
    /// Most frequent vocabulary skills.
    pub top_skills: Vec<SkillCount>,
    /// Non-fatal issues absorbed while building the report.
    #[serde(default)]
    pub warnings: Vec<JoblensError>,
}
