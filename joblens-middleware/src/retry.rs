//! Bounded retries with exponential backoff for transient upstream failures.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use joblens_core::connector::{HistogramProvider, JobConnector, SearchProvider};
use joblens_core::{
    JoblensError, MarketDescriptor, RetryConfig, SalaryHistogram, SearchPage, SearchRequest,
};
use rand::Rng;

/// Base delay plus a random jitter of up to `jitter_percent` of it.
#[must_use]
pub fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, (base_ms.saturating_mul(u64::from(jitter_percent))) / 100)
    };
    let mut rng = rand::rng();
    base_ms + rng.random_range(0..jitter_range)
}

/// Un-jittered delay before retry number `retry` (1-based).
#[must_use]
pub fn backoff_ms(cfg: &RetryConfig, retry: u32) -> u64 {
    let factor = u64::from(cfg.factor.max(1));
    let mut delay = cfg.min_backoff_ms;
    for _ in 1..retry {
        delay = delay.saturating_mul(factor);
        if delay >= cfg.max_backoff_ms {
            break;
        }
    }
    delay.min(cfg.max_backoff_ms)
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent. The last error is returned.
///
/// # Errors
/// Propagates the final error from `op`.
pub async fn with_retry<T, F, Fut>(cfg: &RetryConfig, mut op: F) -> Result<T, JoblensError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, JoblensError>>,
{
    let attempts = cfg.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < attempts && e.is_retryable() => {
                let wait = jitter_wait(backoff_ms(cfg, attempt), u32::from(cfg.jitter_percent));
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt, wait_ms = wait, error = %e, "retrying upstream call");
                tokio::time::sleep(Duration::from_millis(wait)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Declarative wrapper that adds bounded retries to every upstream call.
pub struct RetryMiddleware {
    cfg: RetryConfig,
}

impl RetryMiddleware {
    /// Retry according to `cfg`.
    #[must_use]
    pub const fn new(cfg: RetryConfig) -> Self {
        Self { cfg }
    }
}

impl joblens_core::Middleware for RetryMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn JobConnector>) -> Arc<dyn JobConnector> {
        Arc::new(RetryingConnector::new(inner, self.cfg))
    }

    fn name(&self) -> &'static str {
        "RetryingConnector"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "max_attempts": self.cfg.max_attempts,
            "min_backoff_ms": self.cfg.min_backoff_ms,
            "max_backoff_ms": self.cfg.max_backoff_ms,
            "factor": self.cfg.factor,
            "jitter_percent": self.cfg.jitter_percent,
        })
    }
}

/// Connector wrapper retrying transient failures of the inner connector.
pub struct RetryingConnector {
    inner: Arc<dyn JobConnector>,
    cfg: RetryConfig,
}

impl RetryingConnector {
    /// Wrap `inner` with the retry policy `cfg`.
    #[must_use]
    pub const fn new(inner: Arc<dyn JobConnector>, cfg: RetryConfig) -> Self {
        Self { inner, cfg }
    }
}

impl JobConnector for RetryingConnector {
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
impl SearchProvider for RetryingConnector {
    async fn search(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError> {
        let inner = self
            .inner
            .as_search_provider()
            .ok_or_else(|| JoblensError::unsupported("search"))?;
        with_retry(&self.cfg, || inner.search(market, req)).await
    }
}

#[async_trait]
impl HistogramProvider for RetryingConnector {
    async fn histogram(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError> {
        let inner = self
            .inner
            .as_histogram_provider()
            .ok_or_else(|| JoblensError::unsupported("histogram"))?;
        with_retry(&self.cfg, || inner.histogram(market, query)).await
    }
}
