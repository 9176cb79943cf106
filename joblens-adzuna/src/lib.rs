//! joblens-adzuna
//!
//! Connectors that implement `JobConnector` on top of the Adzuna jobs API
//! (listing search and salary histograms) and `RateProvider` on top of an
//! exchange-rate endpoint.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod builder;
mod models;
mod rates;

use std::sync::Arc;

use adapter::{AdzunaListings, CONNECTOR_NAME, Credentials, RealAdapter};
use async_trait::async_trait;
use joblens_core::{
    JoblensError, MarketDescriptor, SalaryHistogram, SearchPage, SearchRequest,
    connector::{HistogramProvider, JobConnector, SearchProvider},
};

pub use builder::AdzunaConnectorBuilder;
pub use rates::ExchangeRateConnector;

/// Locales the Adzuna API serves.
const SUPPORTED_LOCALES: &[&str] = &[
    "at", "au", "be", "br", "ca", "ch", "de", "es", "fr", "gb", "in", "it", "mx", "nl", "nz",
    "pl", "sg", "us", "za",
];

/// Public connector type. Production users construct it with
/// `AdzunaConnector::new(app_id, app_key)`.
pub struct AdzunaConnector {
    listings: Arc<dyn AdzunaListings>,
}

impl AdzunaConnector {
    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("no such")
    }

    fn normalize_error(e: JoblensError, what: &str) -> JoblensError {
        match e {
            JoblensError::Connector { connector: _, msg } => {
                if Self::looks_like_not_found(&msg) {
                    JoblensError::not_found(what.to_string())
                } else {
                    JoblensError::connector(CONNECTOR_NAME, msg)
                }
            }
            JoblensError::Http { status: 404, .. } => JoblensError::not_found(what.to_string()),
            JoblensError::Other(msg) => JoblensError::connector(CONNECTOR_NAME, msg),
            other => other,
        }
    }

    /// Build against the public API with the given application credentials.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be constructed.
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Result<Self, JoblensError> {
        let adapter = RealAdapter::new(Credentials::new(app_id, app_key))?;
        Ok(Self::from_adapter(adapter))
    }

    /// Build against a custom API root (e.g. a proxy or a local stub server).
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unusable URL.
    pub fn with_base_url(
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, JoblensError> {
        let adapter = RealAdapter::with_base_url(Credentials::new(app_id, app_key), base_url)?;
        Ok(Self::from_adapter(adapter))
    }

    /// Build from any listings adapter.
    pub fn from_adapter<A: AdzunaListings + 'static>(adapter: A) -> Self {
        Self {
            listings: Arc::new(adapter),
        }
    }

    /// Build from a shared listings adapter (tests inject closures here).
    #[must_use]
    pub fn from_shared(listings: Arc<dyn AdzunaListings>) -> Self {
        Self { listings }
    }
}

impl JobConnector for AdzunaConnector {
    fn name(&self) -> &'static str {
        CONNECTOR_NAME
    }

    fn vendor(&self) -> &'static str {
        "Adzuna"
    }

    fn supports_market(&self, market: &MarketDescriptor) -> bool {
        SUPPORTED_LOCALES.contains(&&*market.locale)
    }

    fn as_search_provider(&self) -> Option<&dyn SearchProvider> {
        Some(self as &dyn SearchProvider)
    }

    fn as_histogram_provider(&self) -> Option<&dyn HistogramProvider> {
        Some(self as &dyn HistogramProvider)
    }
}

#[async_trait]
impl SearchProvider for AdzunaConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "joblens_adzuna::search",
            skip(self, req),
            fields(locale = %market.locale, query = %req.query()),
        )
    )]
    async fn search(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError> {
        if !self.supports_market(market) {
            return Err(JoblensError::unsupported(format!("search/{}", market.locale)));
        }
        self.listings
            .search(&market.locale, req.query(), req.page_size())
            .await
            .map_err(|e| Self::normalize_error(e, &format!("search for {}", market.code)))
    }
}

#[async_trait]
impl HistogramProvider for AdzunaConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "joblens_adzuna::histogram",
            skip(self),
            fields(locale = %market.locale),
        )
    )]
    async fn histogram(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError> {
        if !self.supports_market(market) {
            return Err(JoblensError::unsupported(format!(
                "histogram/{}",
                market.locale
            )));
        }
        self.listings
            .histogram(&market.locale, query)
            .await
            .map_err(|e| Self::normalize_error(e, &format!("histogram for {}", market.code)))
    }
}
