use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use joblens_core::connector::{HistogramProvider, JobConnector, RateProvider, SearchProvider};
use joblens_core::{
    Capability, JoblensError, MarketDescriptor, RateTable, SalaryHistogram, SearchPage,
    SearchRequest,
};

use crate::fixtures;

/// Instruction for how a method should behave for a given input.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(JoblensError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

impl<T: Clone> MockBehavior<T> {
    async fn run(self) -> Result<T, JoblensError> {
        match self {
            Self::Return(v) => Ok(v),
            Self::Fail(e) => Err(e),
            Self::Hang => std::future::pending().await,
        }
    }
}

/// One observed upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// Which role was invoked.
    pub capability: Capability,
    /// Market code the call was for.
    pub market: String,
    /// Query passed to the call.
    pub query: String,
    /// Time the call started, from Tokio's clock.
    pub at: tokio::time::Instant,
}

#[derive(Default)]
struct InternalState {
    search_rules: HashMap<String, MockBehavior<SearchPage>>,
    histogram_rules: HashMap<String, MockBehavior<SalaryHistogram>>,
    calls: Vec<CallRecord>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
#[derive(Clone)]
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior of `search` calls for a market code.
    pub async fn set_search_behavior(&self, market: &str, behavior: MockBehavior<SearchPage>) {
        let mut guard = self.state.lock().await;
        guard.search_rules.insert(market.to_ascii_uppercase(), behavior);
    }

    /// Set the behavior of `histogram` calls for a market code.
    pub async fn set_histogram_behavior(
        &self,
        market: &str,
        behavior: MockBehavior<SalaryHistogram>,
    ) {
        let mut guard = self.state.lock().await;
        guard
            .histogram_rules
            .insert(market.to_ascii_uppercase(), behavior);
    }

    /// Every call observed so far, in start order.
    pub async fn calls(&self) -> Vec<CallRecord> {
        self.state.lock().await.calls.clone()
    }

    /// Number of calls observed for one capability.
    pub async fn call_count(&self, capability: Capability) -> usize {
        let guard = self.state.lock().await;
        guard
            .calls
            .iter()
            .filter(|c| c.capability == capability)
            .count()
    }

    /// Clear all configured behaviors and the call log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.search_rules.clear();
        guard.histogram_rules.clear();
        guard.calls.clear();
    }
}

/// A connector that defers behavior to an external controller.
///
/// Markets without a configured rule are served from the static fixtures.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a connector and the controller that scripts it.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<Self>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let connector = Arc::new(Self {
            name,
            state: Arc::clone(&state),
        });
        (connector, DynamicMockController { state })
    }

    async fn record(&self, capability: Capability, market: &MarketDescriptor, query: &str) {
        let mut guard = self.state.lock().await;
        guard.calls.push(CallRecord {
            capability,
            market: market.code.to_string(),
            query: query.to_string(),
            at: tokio::time::Instant::now(),
        });
    }
}

impl JobConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
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
impl SearchProvider for DynamicMockConnector {
    async fn search(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError> {
        self.record(Capability::Search, market, req.query()).await;
        // lock released before any await on the behavior
        let rule = {
            let guard = self.state.lock().await;
            guard.search_rules.get(&*market.code).cloned()
        };
        match rule {
            Some(b) => b.run().await,
            None => Ok(fixtures::postings::search(market, req)),
        }
    }
}

#[async_trait]
impl HistogramProvider for DynamicMockConnector {
    async fn histogram(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError> {
        self.record(Capability::Histogram, market, query).await;
        let rule = {
            let guard = self.state.lock().await;
            guard.histogram_rules.get(&*market.code).cloned()
        };
        match rule {
            Some(b) => b.run().await,
            None => Ok(fixtures::postings::histogram(market)),
        }
    }
}

/// Rate provider with a scripted behavior and a call counter.
pub struct DynamicRateProvider {
    behavior: Mutex<MockBehavior<RateTable>>,
    calls: Mutex<usize>,
}

impl DynamicRateProvider {
    /// Start out answering with `behavior`.
    #[must_use]
    pub fn new(behavior: MockBehavior<RateTable>) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: Mutex::new(0),
        }
    }

    /// Start out answering with the fixed fixture table.
    #[must_use]
    pub fn fixtures(base: &str) -> Self {
        Self::new(MockBehavior::Return(fixtures::rates::latest(base)))
    }

    /// Replace the behavior for subsequent calls.
    pub async fn set_behavior(&self, behavior: MockBehavior<RateTable>) {
        *self.behavior.lock().await = behavior;
    }

    /// Number of `latest` calls observed.
    pub async fn call_count(&self) -> usize {
        *self.calls.lock().await
    }
}

#[async_trait]
impl RateProvider for DynamicRateProvider {
    fn name(&self) -> &'static str {
        "joblens-mock-rates"
    }

    async fn latest(&self, _base: &str) -> Result<RateTable, JoblensError> {
        *self.calls.lock().await += 1;
        let behavior = self.behavior.lock().await.clone();
        behavior.run().await
    }
}
