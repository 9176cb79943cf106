//! Wire shapes of the Adzuna and exchange-rate endpoints.
//!
//! Only the fields the aggregation reads are modeled; everything else in the
//! upstream payloads is ignored.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use joblens_core::{Posting, RateTable, SalaryHistogram, SearchPage};
use serde::Deserialize;

/// `GET {base}/{locale}/search/1` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Total listings matching the query in the market.
    #[serde(default)]
    pub count: u64,
    /// The requested page of postings.
    #[serde(default)]
    pub results: Vec<JobAd>,
}

/// One posting as returned by Adzuna.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobAd {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// `GET {base}/{locale}/histogram` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistogramResponse {
    #[serde(default)]
    pub histogram: BTreeMap<String, u64>,
}

/// `GET {base}/latest/{BASE}` response of the exchange-rate service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestRatesResponse {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
    /// Unix seconds of the upstream's last refresh.
    #[serde(default)]
    pub time_last_updated: Option<i64>,
}

impl From<JobAd> for Posting {
    fn from(ad: JobAd) -> Self {
        Self {
            title: ad.title,
            description: ad.description,
            location: ad.location.and_then(|l| l.display_name),
            salary_min: ad.salary_min,
            salary_max: ad.salary_max,
            highlights: Vec::new(),
        }
    }
}

impl From<SearchResponse> for SearchPage {
    fn from(r: SearchResponse) -> Self {
        Self {
            count: r.count,
            results: r.results.into_iter().map(Posting::from).collect(),
        }
    }
}

impl From<HistogramResponse> for SalaryHistogram {
    fn from(r: HistogramResponse) -> Self {
        r.histogram
    }
}

impl LatestRatesResponse {
    /// Convert into a `RateTable`, falling back to `requested` when the payload omits its base.
    #[must_use]
    pub fn into_table(self, requested: &str) -> RateTable {
        let fetched_at = self
            .time_last_updated
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .or_else(|| Some(Utc::now()));
        RateTable {
            base: self
                .base
                .map_or_else(|| requested.to_string(), |b| b.to_ascii_uppercase()),
            rates: self.rates,
            fetched_at,
        }
    }
}
