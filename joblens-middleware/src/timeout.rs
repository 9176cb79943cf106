//! Per-call deadlines for upstream requests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use joblens_core::connector::{HistogramProvider, JobConnector, SearchProvider};
use joblens_core::{
    Capability, JoblensError, MarketDescriptor, SalaryHistogram, SearchPage, SearchRequest,
};

/// Wrap a provider future with a timeout and standardized timeout error mapping.
///
/// # Errors
/// Returns `ProviderTimeout` when `fut` does not finish within `timeout`, or
/// the error produced by `fut`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "joblens::middleware::provider_call_with_timeout",
        skip(fut),
        fields(
            connector = connector_name,
            capability = %capability,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ),
    )
)]
pub async fn provider_call_with_timeout<T, Fut>(
    connector_name: &'static str,
    capability: Capability,
    timeout: Duration,
    fut: Fut,
) -> Result<T, JoblensError>
where
    Fut: Future<Output = Result<T, JoblensError>>,
{
    (tokio::time::timeout(timeout, fut).await).unwrap_or_else(|_| {
        Err(JoblensError::provider_timeout(
            connector_name,
            capability.as_str(),
        ))
    })
}

/// Declarative wrapper giving every upstream call its own deadline.
pub struct TimeoutMiddleware {
    timeout: Duration,
}

impl TimeoutMiddleware {
    /// Abort each call that runs longer than `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl joblens_core::Middleware for TimeoutMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn JobConnector>) -> Arc<dyn JobConnector> {
        Arc::new(TimeoutConnector::new(inner, self.timeout))
    }

    fn name(&self) -> &'static str {
        "TimeoutConnector"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "timeout_ms": u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
        })
    }
}

/// Connector wrapper that turns an overlong call into `ProviderTimeout`.
pub struct TimeoutConnector {
    inner: Arc<dyn JobConnector>,
    timeout: Duration,
}

impl TimeoutConnector {
    /// Wrap `inner`, bounding each call by `timeout`.
    #[must_use]
    pub const fn new(inner: Arc<dyn JobConnector>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl JobConnector for TimeoutConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }

    fn supports_market(&self, market: &MarketDescriptor) -> bool {
        self.inner.supports_market(market)
    }

    joblens_core::joblens_connector_accessors!(inner);
}

#[async_trait]
impl SearchProvider for TimeoutConnector {
    async fn search(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError> {
        let inner = self
            .inner
            .as_search_provider()
            .ok_or_else(|| JoblensError::unsupported(Capability::Search.as_str()))?;
        provider_call_with_timeout(
            self.inner.name(),
            Capability::Search,
            self.timeout,
            inner.search(market, req),
        )
        .await
    }
}

#[async_trait]
impl HistogramProvider for TimeoutConnector {
    async fn histogram(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError> {
        let inner = self
            .inner
            .as_histogram_provider()
            .ok_or_else(|| JoblensError::unsupported(Capability::Histogram.as_str()))?;
        provider_call_with_timeout(
            self.inner.name(),
            Capability::Histogram,
            self.timeout,
            inner.histogram(market, query),
        )
        .await
    }
}
