use std::sync::Arc;

use joblens_core::{AnalyticsReport, JoblensError, SearchRequest};

use crate::Joblens;
use crate::router::reduce::{ReduceOptions, reduce};
use crate::router::util::report_cache_key;

impl Joblens {
    /// Cross-market analytics report for `query`.
    ///
    /// Served from the report cache while fresh. Otherwise exchange rates and
    /// the paced market fan-out run concurrently, the outcomes are reduced, and
    /// the report is cached. Upstream failures degrade the report (zeroed
    /// markets and `warnings`) instead of failing the call.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `query` is blank; no upstream call is made.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "joblens::router::analytics", skip(self))
    )]
    pub async fn analytics(&self, query: &str) -> Result<Arc<AnalyticsReport>, JoblensError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(JoblensError::InvalidArg("query is required".into()));
        }
        let key = report_cache_key(query);
        if let Some(hit) = self.reports.get(&key) {
            #[cfg(feature = "tracing")]
            tracing::debug!(key = %key, "report cache hit");
            return Ok(hit);
        }

        let req = SearchRequest::new(query, self.cfg.page_size)?;
        let (rates, outcomes) = tokio::join!(
            self.rates.get_rates(&self.cfg.base_currency),
            self.run_markets(&req, &self.markets),
        );

        let opts = ReduceOptions {
            base_currency: self.cfg.base_currency.clone(),
            top_skills: self.cfg.top_skills,
            generated_at: chrono::Utc::now(),
        };
        let report = Arc::new(reduce(query, &outcomes, &rates, &opts));

        // a concurrent run for the same key may have finished first
        if let Some(existing) = self.reports.get(&key) {
            return Ok(existing);
        }
        self.reports.set(key, Arc::clone(&report));
        Ok(report)
    }
}
