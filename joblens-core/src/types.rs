//! Upstream-neutral data structures exchanged between connectors and the orchestrator.
// Consolidated re-exports so downstream crates can depend on `joblens-core` only

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use joblens_types::{
    AnalyticsReport, CacheConfig, Capability, DemandEntry, JobTypeDistribution,
    JoblensConfig, JoblensError, MarketDescriptor, MarketReport, Pacing, RetryConfig, SalaryEntry,
    SalaryEstimate, SampleDescription, SkillCount,
};

/// Salary bucket (upstream string key, e.g. `"50000"`) → posting count.
pub type SalaryHistogram = BTreeMap<String, u64>;

/// Parameters of one per-market listing search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchRequest {
    query: String,
    page_size: u32,
}

impl SearchRequest {
    /// Build a validated search request.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the query is blank or `page_size` is zero.
    pub fn new(query: impl Into<String>, page_size: u32) -> Result<Self, JoblensError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(JoblensError::InvalidArg("query is required".into()));
        }
        if page_size == 0 {
            return Err(JoblensError::InvalidArg("page size must be positive".into()));
        }
        Ok(Self { query, page_size })
    }

    /// Search term.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Postings requested for the sample.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// One job posting from a search sample.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Posting {
    /// Posting title.
    pub title: String,
    /// Posting body text.
    pub description: String,
    /// Display location, when known.
    pub location: Option<String>,
    /// Lower salary bound in the market's currency.
    pub salary_min: Option<f64>,
    /// Upper salary bound in the market's currency.
    pub salary_max: Option<f64>,
    /// Structured highlight lines when the upstream provides them.
    pub highlights: Vec<String>,
}

/// Result of one search call: the upstream total plus the fetched sample.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchPage {
    /// Total listings the upstream reports for the query in this market.
    pub count: u64,
    /// The sampled postings (bounded by the request's page size).
    pub results: Vec<Posting>,
}

/// Salary bounds of one sampled posting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SalaryBand {
    /// Lower bound, if advertised.
    pub min: Option<f64>,
    /// Upper bound, if advertised.
    pub max: Option<f64>,
}

/// Base currency → per-currency conversion factors.
///
/// `rates["EUR"] == 0.9` means one unit of the base buys 0.9 EUR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Currency the factors are relative to.
    pub base: String,
    /// Currency code → factor.
    pub rates: BTreeMap<String, f64>,
    /// When the table was fetched; `None` for the empty fallback table.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl RateTable {
    /// An empty table: every conversion falls back to the unconverted amount.
    #[must_use]
    pub fn empty(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            rates: BTreeMap::new(),
            fetched_at: None,
        }
    }

    /// Usable factor for `currency`, if any.
    ///
    /// The base currency always resolves to `1.0`. Zero, negative, and
    /// non-finite factors are treated as missing.
    #[must_use]
    pub fn rate_for(&self, currency: &str) -> Option<f64> {
        if currency.eq_ignore_ascii_case(&self.base) {
            return Some(1.0);
        }
        self.rates
            .get(currency)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
    }

    /// True when the table carries no factors at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Everything fetched for one market during one orchestration run.
///
/// Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketFetchResult {
    /// Market the data belongs to.
    pub market: MarketDescriptor,
    /// Upstream-reported listing total.
    pub listing_count: u64,
    /// Salary bounds of every sampled posting that advertised any.
    pub sampled_salaries: Vec<SalaryBand>,
    /// Salary histogram from the histogram call.
    pub histogram: SalaryHistogram,
    /// Sampled postings classified as remote.
    pub sampled_remote_count: u64,
    /// Size of the fetched sample.
    pub sampled_total: u64,
    /// Bounded sample of posting texts.
    pub sample_descriptions: Vec<SampleDescription>,
    /// Per-call failures absorbed while producing this result.
    pub warnings: Vec<JoblensError>,
}

impl MarketFetchResult {
    /// Zero-valued result used when nothing could be fetched for `market`.
    #[must_use]
    pub fn empty(market: MarketDescriptor) -> Self {
        Self {
            market,
            listing_count: 0,
            sampled_salaries: Vec::new(),
            histogram: SalaryHistogram::new(),
            sampled_remote_count: 0,
            sampled_total: 0,
            sample_descriptions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Assemble a result from the (possibly missing) outputs of the two calls.
    ///
    /// A missing page contributes zero listings and an empty sample; a missing
    /// histogram contributes an empty histogram.
    #[must_use]
    pub fn from_parts(
        market: MarketDescriptor,
        page: Option<SearchPage>,
        histogram: Option<SalaryHistogram>,
        max_descriptions: usize,
        warnings: Vec<JoblensError>,
    ) -> Self {
        let page = page.unwrap_or_default();
        let sampled_salaries = page
            .results
            .iter()
            .filter(|p| p.salary_min.is_some() || p.salary_max.is_some())
            .map(|p| SalaryBand {
                min: p.salary_min,
                max: p.salary_max,
            })
            .collect();
        let sampled_remote_count = page
            .results
            .iter()
            .filter(|p| crate::remote::is_remote(p))
            .count() as u64;
        let sample_descriptions = page
            .results
            .iter()
            .take(max_descriptions)
            .map(|p| SampleDescription {
                title: p.title.clone(),
                description: p.description.clone(),
                highlights: p.highlights.clone(),
            })
            .collect();

        Self {
            market,
            listing_count: page.count,
            sampled_salaries,
            histogram: histogram.unwrap_or_default(),
            sampled_remote_count,
            sampled_total: page.results.len() as u64,
            sample_descriptions,
            warnings,
        }
    }
}

/// Tagged outcome of fetching one market.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketOutcome {
    /// At least one of the market's calls succeeded.
    Fetched(MarketFetchResult),
    /// Every call for the market failed.
    Failed {
        /// Market that could not be fetched.
        market: MarketDescriptor,
        /// Why the market failed.
        reason: JoblensError,
    },
}

impl MarketOutcome {
    /// Market this outcome belongs to.
    #[must_use]
    pub const fn market(&self) -> &MarketDescriptor {
        match self {
            Self::Fetched(r) => &r.market,
            Self::Failed { market, .. } => market,
        }
    }

    /// True when nothing could be fetched for the market.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
