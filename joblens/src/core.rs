use std::sync::Arc;
use std::time::Duration;

use joblens_core::{
    CacheConfig, Clock, JobConnector, JoblensConfig, JoblensError, MarketDescriptor, Pacing,
    RateProvider, RetryConfig, TokioClock, list_markets,
};
use joblens_middleware::{ConnectorBuilder, TokenBucket, TtlCache};
use joblens_types::AnalyticsReport;
use tokio::sync::Semaphore;

use crate::rates::ExchangeRates;

/// Orchestrator that fans a query out across job markets and folds the
/// results into one cached report.
pub struct Joblens {
    pub(crate) connector: Arc<dyn JobConnector>,
    pub(crate) rates: ExchangeRates,
    pub(crate) markets: Vec<MarketDescriptor>,
    pub(crate) cfg: JoblensConfig,
    pub(crate) reports: TtlCache<String, Arc<AnalyticsReport>>,
    /// Caps markets in flight under `Pacing::TokenBucket`.
    pub(crate) permits: Option<Semaphore>,
}

/// Builder for constructing a `Joblens` orchestrator with custom configuration.
pub struct JoblensBuilder {
    connector: Option<Arc<dyn JobConnector>>,
    rate_provider: Option<Arc<dyn RateProvider>>,
    markets: Option<Vec<MarketDescriptor>>,
    cfg: JoblensConfig,
    retry: RetryConfig,
    listing_cache: Option<CacheConfig>,
    clock: Arc<dyn Clock>,
}

impl Default for JoblensBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JoblensBuilder {
    /// Create a new builder with defaults.
    ///
    /// Defaults: all ten registry markets, USD base currency, batches of two
    /// markets with a 1.2 s pause, a single attempt per upstream call, and
    /// raw listing responses cached for five minutes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            rate_provider: None,
            markets: None,
            cfg: JoblensConfig::default(),
            retry: RetryConfig::disabled(),
            listing_cache: Some(CacheConfig::listings()),
            clock: Arc::new(TokioClock),
        }
    }

    /// Register the job-listing connector.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn JobConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Register the exchange-rate source. Without one, salaries are never converted.
    #[must_use]
    pub fn with_rate_provider(mut self, p: Arc<dyn RateProvider>) -> Self {
        self.rate_provider = Some(p);
        self
    }

    /// Restrict or reorder the markets covered by each report.
    #[must_use]
    pub fn markets(mut self, markets: Vec<MarketDescriptor>) -> Self {
        self.markets = Some(markets);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: JoblensConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Currency that cross-market salaries are normalized into.
    #[must_use]
    pub fn base_currency(mut self, code: impl Into<String>) -> Self {
        self.cfg.base_currency = code.into().trim().to_ascii_uppercase();
        self
    }

    /// Postings sampled per market search.
    #[must_use]
    pub const fn page_size(mut self, n: u32) -> Self {
        self.cfg.page_size = n;
        self
    }

    /// Upper bound on sample descriptions kept per market.
    #[must_use]
    pub const fn max_descriptions(mut self, n: usize) -> Self {
        self.cfg.max_descriptions = n;
        self
    }

    /// Number of skills kept in the skill ranking.
    #[must_use]
    pub const fn top_skills(mut self, n: usize) -> Self {
        self.cfg.top_skills = n;
        self
    }

    /// Pause between the two upstream calls made for the same market.
    #[must_use]
    pub const fn market_call_gap(mut self, gap: Duration) -> Self {
        self.cfg.market_call_gap = gap;
        self
    }

    /// Deadline applied to each individual upstream call.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// How market fetches are paced.
    #[must_use]
    pub const fn pacing(mut self, pacing: Pacing) -> Self {
        self.cfg.pacing = pacing;
        self
    }

    /// Capacity and lifetime of cached reports.
    #[must_use]
    pub const fn report_cache(mut self, cfg: CacheConfig) -> Self {
        self.cfg.report_cache = cfg;
        self
    }

    /// Lifetime of a fetched exchange-rate table.
    #[must_use]
    pub const fn rates_ttl(mut self, ttl: Duration) -> Self {
        self.cfg.rates_ttl = ttl;
        self
    }

    /// Retry policy for transient upstream failures.
    #[must_use]
    pub const fn retry(mut self, cfg: RetryConfig) -> Self {
        self.retry = cfg;
        self
    }

    /// Cache raw listing responses with `cfg`, or disable with `None`.
    #[must_use]
    pub const fn listing_cache(mut self, cfg: Option<CacheConfig>) -> Self {
        self.listing_cache = cfg;
        self
    }

    /// Clock driving every cache owned by the orchestrator.
    ///
    /// Pacing delays always run on Tokio time.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the `Joblens` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no connector is registered, the market list is
    /// empty, the page size is zero, or the pacing parameters are unusable.
    pub fn build(self) -> Result<Joblens, JoblensError> {
        let raw = self.connector.ok_or_else(|| {
            JoblensError::InvalidArg(
                "no connector registered; add one via with_connector(...)".to_string(),
            )
        })?;
        let markets = self.markets.unwrap_or_else(list_markets);
        if markets.is_empty() {
            return Err(JoblensError::InvalidArg("market list is empty".into()));
        }
        if self.cfg.page_size == 0 {
            return Err(JoblensError::InvalidArg("page size must be positive".into()));
        }

        let mut stack = ConnectorBuilder::new(raw)
            .with_timeout(self.cfg.provider_timeout)
            .with_retry(self.retry);
        let permits = match self.cfg.pacing {
            Pacing::Batched { batch_size, .. } => {
                if batch_size == 0 {
                    return Err(JoblensError::InvalidArg("batch size must be positive".into()));
                }
                None
            }
            Pacing::TokenBucket {
                max_concurrency,
                requests_per_second,
                burst,
            } => {
                if max_concurrency == 0 {
                    return Err(JoblensError::InvalidArg(
                        "max concurrency must be positive".into(),
                    ));
                }
                // every upstream call, search or histogram, takes a token
                let bucket = TokenBucket::new(requests_per_second, burst)?;
                stack = stack.with_rate_limit(Arc::new(bucket));
                Some(Semaphore::new(max_concurrency))
            }
        };

        if let Some(cache) = self.listing_cache {
            stack = stack.with_cache_clock(cache, Arc::clone(&self.clock));
        }
        let connector = stack.build();

        let rates = ExchangeRates::new(
            self.rate_provider,
            self.cfg.rates_ttl,
            self.cfg.provider_timeout,
            Arc::clone(&self.clock),
        );
        let reports = TtlCache::with_clock(self.cfg.report_cache, self.clock);

        Ok(Joblens {
            connector,
            rates,
            markets,
            cfg: self.cfg,
            reports,
            permits,
        })
    }
}

/// Attribute an untagged upstream error to `connector`.
pub fn tag_err(connector: &str, e: JoblensError) -> JoblensError {
    match e {
        e @ (JoblensError::NotFound { .. }
        | JoblensError::ProviderTimeout { .. }
        | JoblensError::Connector { .. }
        | JoblensError::Http { .. }
        | JoblensError::RateLimitExceeded { .. }
        | JoblensError::Market { .. }
        | JoblensError::AllProvidersFailed(_)) => e,
        other => JoblensError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

impl Joblens {
    /// Start building a new `Joblens` instance.
    #[must_use]
    pub fn builder() -> JoblensBuilder {
        JoblensBuilder::new()
    }

    /// Markets covered by each report, in report order.
    #[must_use]
    pub fn markets(&self) -> &[MarketDescriptor] {
        &self.markets
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &JoblensConfig {
        &self.cfg
    }

    /// Exchange-rate service used for salary normalization.
    #[must_use]
    pub const fn exchange_rates(&self) -> &ExchangeRates {
        &self.rates
    }

    /// Number of live cached reports.
    #[must_use]
    pub fn cached_reports(&self) -> usize {
        self.reports.len()
    }
}
