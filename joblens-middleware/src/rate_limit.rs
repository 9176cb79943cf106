//! Token-bucket rate limiting for upstream calls.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use joblens_core::connector::{HistogramProvider, JobConnector, SearchProvider};
use joblens_core::{
    Clock, JoblensError, MarketDescriptor, SalaryHistogram, SearchPage, SearchRequest,
    TokioClock,
};

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Classic token bucket: holds up to `burst` tokens, refilled continuously at
/// `requests_per_second`.
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucket")
            .field("capacity", &self.capacity)
            .field("refill_per_sec", &self.refill_per_sec)
            .finish_non_exhaustive()
    }
}

impl TokenBucket {
    /// A full bucket driven by Tokio's clock.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the rate is not a positive finite number or
    /// `burst` is zero.
    pub fn new(requests_per_second: f64, burst: u32) -> Result<Self, JoblensError> {
        Self::with_clock(requests_per_second, burst, Arc::new(TokioClock))
    }

    /// A full bucket driven by `clock`.
    ///
    /// # Errors
    /// Same as [`TokenBucket::new`].
    pub fn with_clock(
        requests_per_second: f64,
        burst: u32,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, JoblensError> {
        if !(requests_per_second.is_finite() && requests_per_second > 0.0) {
            return Err(JoblensError::InvalidArg(
                "requests_per_second must be positive".into(),
            ));
        }
        if burst == 0 {
            return Err(JoblensError::InvalidArg("burst must be at least 1".into()));
        }
        let capacity = f64::from(burst);
        Ok(Self {
            capacity,
            refill_per_sec: requests_per_second,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: clock.now(),
            }),
            clock,
        })
    }

    /// Take one token if available; otherwise report how long until one is.
    fn take_or_wait(&self) -> Result<(), Duration> {
        let now = self.clock.now();
        let mut st = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let elapsed = now.saturating_duration_since(st.last_refill).as_secs_f64();
        st.tokens = (st.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        st.last_refill = now;
        if st.tokens >= 1.0 {
            st.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64(
                (1.0 - st.tokens) / self.refill_per_sec,
            ))
        }
    }

    /// Take a token without waiting.
    ///
    /// # Errors
    /// Returns `RateLimitExceeded` when the bucket is empty.
    pub fn try_acquire(&self) -> Result<(), JoblensError> {
        self.take_or_wait()
            .map_err(|wait| JoblensError::RateLimitExceeded {
                limit: self.capacity as u64,
                window_ms: u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            })
    }

    /// Wait until a token is available and take it.
    pub async fn acquire(&self) {
        loop {
            match self.take_or_wait() {
                Ok(()) => return,
                Err(wait) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(wait_ms = wait.as_millis() as u64, "token bucket empty");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

/// Declarative wrapper that paces every upstream call through a token bucket.
pub struct RateLimitMiddleware {
    bucket: Arc<TokenBucket>,
}

impl RateLimitMiddleware {
    /// Pace calls through `bucket`. The bucket may be shared with other wrappers.
    #[must_use]
    pub const fn new(bucket: Arc<TokenBucket>) -> Self {
        Self { bucket }
    }
}

impl joblens_core::Middleware for RateLimitMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn JobConnector>) -> Arc<dyn JobConnector> {
        Arc::new(RateLimitedConnector::new(inner, self.bucket))
    }

    fn name(&self) -> &'static str {
        "RateLimitedConnector"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "burst": self.bucket.capacity,
            "requests_per_second": self.bucket.refill_per_sec,
        })
    }
}

/// Connector wrapper that takes one token before each upstream call.
pub struct RateLimitedConnector {
    inner: Arc<dyn JobConnector>,
    bucket: Arc<TokenBucket>,
}

impl RateLimitedConnector {
    /// Wrap `inner`, pacing calls through `bucket`.
    #[must_use]
    pub const fn new(inner: Arc<dyn JobConnector>, bucket: Arc<TokenBucket>) -> Self {
        Self { inner, bucket }
    }
}

impl JobConnector for RateLimitedConnector {
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
impl SearchProvider for RateLimitedConnector {
    async fn search(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError> {
        let inner = self
            .inner
            .as_search_provider()
            .ok_or_else(|| JoblensError::unsupported("search"))?;
        self.bucket.acquire().await;
        inner.search(market, req).await
    }
}

#[async_trait]
impl HistogramProvider for RateLimitedConnector {
    async fn histogram(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError> {
        let inner = self
            .inner
            .as_histogram_provider()
            .ok_or_else(|| JoblensError::unsupported("histogram"))?;
        self.bucket.acquire().await;
        inner.histogram(market, query).await
    }
}
