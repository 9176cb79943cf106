// Shared builders and connector wrappers for orchestrator tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use joblens::{Joblens, JoblensBuilder};
use joblens_core::connector::{HistogramProvider, JobConnector, SearchProvider};
use joblens_core::{
    JoblensError, MarketDescriptor, SalaryHistogram, SearchPage, SearchRequest, find_market,
};
use joblens_mock::{DynamicMockConnector, DynamicMockController, DynamicRateProvider};

pub fn market(code: &str) -> MarketDescriptor {
    find_market(code).expect("registry market")
}

/// Builder wired to a scriptable connector and the fixture rate table.
pub fn scripted() -> (JoblensBuilder, DynamicMockController, Arc<DynamicRateProvider>) {
    let (connector, controller) = DynamicMockConnector::new_with_controller("dyn");
    let rates = Arc::new(DynamicRateProvider::fixtures("USD"));
    let builder = Joblens::builder()
        .with_connector(connector)
        .with_rate_provider(Arc::clone(&rates) as Arc<dyn joblens_core::RateProvider>);
    (builder, controller, rates)
}

/// Wrapper delaying every call for selected markets.
pub struct DelayedConnector {
    inner: Arc<dyn JobConnector>,
    delays: HashMap<String, Duration>,
}

impl DelayedConnector {
    pub fn new(inner: Arc<dyn JobConnector>, delays: &[(&str, Duration)]) -> Self {
        Self {
            inner,
            delays: delays
                .iter()
                .map(|(code, d)| ((*code).to_string(), *d))
                .collect(),
        }
    }

    async fn pause(&self, market: &MarketDescriptor) {
        if let Some(d) = self.delays.get(&*market.code) {
            tokio::time::sleep(*d).await;
        }
    }
}

impl JobConnector for DelayedConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    joblens_core::joblens_connector_accessors!(inner);
}

#[async_trait]
impl SearchProvider for DelayedConnector {
    async fn search(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError> {
        self.pause(market).await;
        self.inner
            .as_search_provider()
            .expect("search")
            .search(market, req)
            .await
    }
}

#[async_trait]
impl HistogramProvider for DelayedConnector {
    async fn histogram(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError> {
        self.pause(market).await;
        self.inner
            .as_histogram_provider()
            .expect("histogram")
            .histogram(market, query)
            .await
    }
}
