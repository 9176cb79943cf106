use joblens_core::{
    Capability, JoblensError, MarketDescriptor, MarketFetchResult, MarketOutcome, SalaryHistogram,
    SearchPage, SearchRequest,
};

use crate::Joblens;
use crate::core::tag_err;
use crate::router::util::collapse_errors;

impl Joblens {
    async fn search_once(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> Result<SearchPage, JoblensError> {
        let name = self.connector.name();
        let provider = self
            .connector
            .as_search_provider()
            .ok_or_else(|| JoblensError::unsupported(Capability::Search.to_string()))?;
        provider
            .search(market, req)
            .await
            .map_err(|e| tag_err(name, e))
    }

    async fn histogram_once(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<SalaryHistogram, JoblensError> {
        let name = self.connector.name();
        let provider = self
            .connector
            .as_histogram_provider()
            .ok_or_else(|| JoblensError::unsupported(Capability::Histogram.to_string()))?;
        provider
            .histogram(market, query)
            .await
            .map_err(|e| tag_err(name, e))
    }

    /// Fetch one market: a search call and, after a fixed gap, a histogram call.
    ///
    /// Each call fails independently; a failed call contributes an empty part
    /// and a warning. The outcome is `Failed` only when both calls fail.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "joblens::router::fetch::fetch_market",
            skip(self, req),
            fields(market = %market.code, query = %req.query()),
        )
    )]
    pub(crate) async fn fetch_market_with(
        &self,
        market: &MarketDescriptor,
        req: &SearchRequest,
    ) -> MarketOutcome {
        let search = self.search_once(market, req).await;
        tokio::time::sleep(self.cfg.market_call_gap).await;
        let histogram = self.histogram_once(market, req.query()).await;

        let mut warnings = Vec::new();
        let page = search
            .map_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::warn!(market = %market.code, error = %e, "search failed");
                warnings.push(JoblensError::for_market(market.code.to_string(), e));
            })
            .ok();
        let histogram = histogram
            .map_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::warn!(market = %market.code, error = %e, "histogram failed");
                warnings.push(JoblensError::for_market(market.code.to_string(), e));
            })
            .ok();

        if page.is_none() && histogram.is_none() {
            return MarketOutcome::Failed {
                market: market.clone(),
                reason: collapse_errors(Capability::Analytics, warnings),
            };
        }
        MarketOutcome::Fetched(MarketFetchResult::from_parts(
            market.clone(),
            page,
            histogram,
            self.cfg.max_descriptions,
            warnings,
        ))
    }

    /// Fetch one market for `query`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the query is blank. Upstream failures never
    /// surface here; they are folded into the returned outcome.
    pub async fn fetch_market(
        &self,
        market: &MarketDescriptor,
        query: &str,
    ) -> Result<MarketOutcome, JoblensError> {
        let req = SearchRequest::new(query.trim(), self.cfg.page_size)?;
        Ok(self.fetch_market_with(market, &req).await)
    }
}
