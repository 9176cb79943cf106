//! joblens-mock
//!
//! Deterministic and scriptable connectors for tests and demos. Nothing here
//! performs network I/O.

use std::time::Duration;

use async_trait::async_trait;
use joblens_core::connector::{HistogramProvider, JobConnector, RateProvider, SearchProvider};
use joblens_core::{
    JoblensError, MarketDescriptor, RateTable, SalaryHistogram, SearchPage, SearchRequest,
};

mod dynamic;
mod fixtures;

pub use dynamic::{
    CallRecord, DynamicMockConnector, DynamicMockController, DynamicRateProvider, MockBehavior,
};
pub use fixtures::postings::{listing_count, typical_salary};

/// Mock connector serving deterministic data from static fixtures.
///
/// The query `"FAIL"` makes every call fail; `"TIMEOUT"` adds a short delay
/// before answering.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Create the fixture-backed connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(query: &str, capability: &'static str) -> Result<(), JoblensError> {
        match query {
            "FAIL" => Err(JoblensError::connector(
                "joblens-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl JobConnector for MockConnector {
    fn name(&self) -> &'static str {
        "joblens-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_search_provider(&self) -> Option<&dyn SearchProvider> {
        Some(self as &dyn SearchProvider)
    }

    fn as_histogram_provider(&self) -> Option<&dyn HistogramProvider> {
        Some(self as &dyn HistogramProvider)
    }
}

#[async_trait]
impl SearchProvider for MockConnector {
    async fn search(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError> {
        Self::maybe_fail_or_timeout(req.query(), "search").await?;
        Ok(fixtures::postings::search(market, req))
    }
}

#[async_trait]
impl HistogramProvider for MockConnector {
    async fn histogram(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError> {
        Self::maybe_fail_or_timeout(query, "histogram").await?;
        Ok(fixtures::postings::histogram(market))
    }
}

/// Rate provider answering with a fixed USD-based table.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockRateProvider;

impl MockRateProvider {
    /// The fixed table rebased onto `base`; empty for unknown currencies.
    #[must_use]
    pub fn table(base: &str) -> RateTable {
        fixtures::rates::latest(base)
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &'static str {
        "joblens-mock-rates"
    }

    async fn latest(&self, base: &str) -> Result<RateTable, JoblensError> {
        Ok(fixtures::rates::latest(base))
    }
}
