use async_trait::async_trait;

use crate::types::{
    JoblensError, MarketDescriptor, RateTable, SalaryHistogram, SearchPage, SearchRequest,
};

/// Focused role trait for connectors that return a listing sample plus the
/// upstream listing total for one market.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search `market` for postings matching `req`.
    async fn search(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError>;
}

/// Focused role trait for connectors that return a salary histogram.
#[async_trait]
pub trait HistogramProvider: Send + Sync {
    /// Fetch the salary distribution for `query` in `market`.
    async fn histogram(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError>;
}

/// Source of currency conversion tables.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// A stable identifier used in logs and error attribution.
    fn name(&self) -> &'static str;

    /// Fetch the latest table of factors relative to `base`.
    async fn latest(&self, base: &str) -> Result<RateTable, JoblensError>;
}

/// Primary connector trait for job-listing upstreams.
///
/// Capabilities are advertised through the `as_*_provider` accessors; a
/// connector that cannot serve a capability returns `None`.
pub trait JobConnector: Send + Sync {
    /// A stable identifier (e.g. "joblens-adzuna").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether this connector claims to cover `market`.
    fn supports_market(&self, market: &MarketDescriptor) -> bool {
        let _ = market;
        true
    }

    /// If implemented, returns a trait object for listing search.
    fn as_search_provider(&self) -> Option<&dyn SearchProvider> {
        None
    }

    /// If implemented, returns a trait object for salary histograms.
    fn as_histogram_provider(&self) -> Option<&dyn HistogramProvider> {
        None
    }
}

/// Generate `as_*_provider` accessors for a wrapper that implements every role
/// trait itself and forwards to the connector stored in field `$inner`.
///
/// A capability is advertised only when the inner connector advertises it.
#[macro_export]
macro_rules! joblens_connector_accessors {
    ($inner:ident) => {
        fn as_search_provider(&self) -> Option<&dyn $crate::connector::SearchProvider> {
            if self.$inner.as_search_provider().is_some() {
                Some(self as &dyn $crate::connector::SearchProvider)
            } else {
                None
            }
        }
        fn as_histogram_provider(&self) -> Option<&dyn $crate::connector::HistogramProvider> {
            if self.$inner.as_histogram_provider().is_some() {
                Some(self as &dyn $crate::connector::HistogramProvider)
            } else {
                None
            }
        }
    };
}
