//! Time-bounded response cache and a connector wrapper built on it.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use joblens_core::connector::{HistogramProvider, JobConnector, SearchProvider};
use joblens_core::{
    CacheConfig, Clock, JoblensError, MarketDescriptor, SalaryHistogram, SearchPage,
    SearchRequest, TokioClock,
};
use lru::LruCache;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Capacity-bounded key/value store whose entries expire after a fixed TTL.
///
/// Reads never refresh an entry's position, so a full cache always evicts the
/// oldest-inserted entry. Setting an existing key counts as a fresh insertion.
/// A zero TTL or zero capacity disables the cache: `get` always misses and
/// `set` stores nothing.
pub struct TtlCache<K, V> {
    // `None` when disabled
    inner: Option<Mutex<LruCache<K, Entry<V>>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Create a cache driven by Tokio's clock.
    #[must_use]
    pub fn new(cfg: CacheConfig) -> Self {
        Self::with_clock(cfg, Arc::new(TokioClock))
    }

    /// Create a cache driven by an explicit clock.
    #[must_use]
    pub fn with_clock(cfg: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let inner = NonZeroUsize::new(cfg.capacity)
            .filter(|_| !cfg.ttl.is_zero())
            .map(|cap| Mutex::new(LruCache::new(cap)));
        Self {
            inner,
            ttl: cfg.ttl,
            clock,
        }
    }

    fn is_fresh(&self, entry: &Entry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) < self.ttl
    }

    /// Look up a live entry. An expired entry is removed and reported as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let store = self.inner.as_ref()?;
        let now = self.clock.now();
        let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = guard.peek(key).map(|e| self.is_fresh(e, now))?;
        if fresh {
            guard.peek(key).map(|e| e.value.clone())
        } else {
            guard.pop(key);
            None
        }
    }

    /// Store `value` under `key`, evicting the oldest entry when full.
    pub fn set(&self, key: K, value: V) {
        let Some(store) = self.inner.as_ref() else {
            return;
        };
        let stored_at = self.clock.now();
        let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
        // pop first so an overwrite moves to the newest position
        guard.pop(&key);
        guard.push(key, Entry { value, stored_at });
    }

    /// Number of live entries. Expired entries are purged as a side effect.
    pub fn len(&self) -> usize {
        let Some(store) = self.inner.as_ref() else {
            return 0;
        };
        let now = self.clock.now();
        let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
        // insertion order matches storage time, so expired entries sit at the old end
        while guard
            .peek_lru()
            .is_some_and(|(_, e)| !self.is_fresh(e, now))
        {
            guard.pop_lru();
        }
        guard.len()
    }

    /// True when the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SearchKey {
    market: String,
    query: String,
    page_size: u32,
}

impl SearchKey {
    fn new(market: &MarketDescriptor, req: &SearchRequest) -> Self {
        Self {
            market: market.code.to_string(),
            query: req.query().to_string(),
            page_size: req.page_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HistogramKey {
    market: String,
    query: String,
}

/// Declarative wrapper that applies raw-response caching when building a connector stack.
pub struct CacheMiddleware {
    cfg: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl CacheMiddleware {
    /// Cache raw responses with `cfg`, driven by Tokio's clock.
    #[must_use]
    pub fn new(cfg: CacheConfig) -> Self {
        Self {
            cfg,
            clock: Arc::new(TokioClock),
        }
    }

    /// Use an explicit clock for entry expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl joblens_core::Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn JobConnector>) -> Arc<dyn JobConnector> {
        let Self { cfg, clock } = *self;
        Arc::new(CachingConnector::with_clock(inner, cfg, clock))
    }

    fn name(&self) -> &'static str {
        "CachingMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "capacity": self.cfg.capacity,
            "ttl_ms": u64::try_from(self.cfg.ttl.as_millis()).unwrap_or(u64::MAX),
        })
    }
}

/// Connector wrapper caching search pages and histograms per market and query.
///
/// Only successful responses are stored; errors always pass through.
pub struct CachingConnector {
    inner: Arc<dyn JobConnector>,
    search: TtlCache<SearchKey, Arc<SearchPage>>,
    histogram: TtlCache<HistogramKey, Arc<SalaryHistogram>>,
}

impl CachingConnector {
    /// Wrap `inner` with caches sized by `cfg`.
    #[must_use]
    pub fn new(inner: Arc<dyn JobConnector>, cfg: CacheConfig) -> Self {
        Self::with_clock(inner, cfg, Arc::new(TokioClock))
    }

    /// Wrap `inner` with caches sized by `cfg` and driven by `clock`.
    #[must_use]
    pub fn with_clock(inner: Arc<dyn JobConnector>, cfg: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            search: TtlCache::with_clock(cfg, Arc::clone(&clock)),
            histogram: TtlCache::with_clock(cfg, clock),
        }
    }
}

impl JobConnector for CachingConnector {
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
impl SearchProvider for CachingConnector {
    async fn search(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError> {
        let key = SearchKey::new(market, req);
        if let Some(hit) = self.search.get(&key) {
            return Ok((*hit).clone());
        }
        let inner = self
            .inner
            .as_search_provider()
            .ok_or_else(|| JoblensError::unsupported("search"))?;
        let page = inner.search(market, req).await?;
        self.search.set(key, Arc::new(page.clone()));
        Ok(page)
    }
}

#[async_trait]
impl HistogramProvider for CachingConnector {
    async fn histogram(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError> {
        let key = HistogramKey {
            market: market.code.to_string(),
            query: query.to_string(),
        };
        if let Some(hit) = self.histogram.get(&key) {
            return Ok((*hit).clone());
        }
        let inner = self
            .inner
            .as_histogram_provider()
            .ok_or_else(|| JoblensError::unsupported("histogram"))?;
        let histogram = inner.histogram(market, query).await?;
        self.histogram.set(key, Arc::new(histogram.clone()));
        Ok(histogram)
    }
}
