use futures::future::join_all;
use joblens_core::{JoblensError, MarketDescriptor, MarketOutcome, Pacing, SearchRequest};

use crate::Joblens;

impl Joblens {
    /// Fetch every market in `markets` under the configured pacing.
    ///
    /// Output order equals input order regardless of completion order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "joblens::router::batch::run",
            skip(self, req, markets),
            fields(markets = markets.len(), query = %req.query()),
        )
    )]
    pub(crate) async fn run_markets(
        &self,
        req: &SearchRequest,
        markets: &[MarketDescriptor],
    ) -> Vec<MarketOutcome> {
        match (self.cfg.pacing, self.permits.as_ref()) {
            (Pacing::TokenBucket { .. }, Some(permits)) => {
                // tokens are taken per upstream call inside the connector stack
                let tasks = markets.iter().map(|m| async move {
                    // the semaphore is never closed
                    let _permit = permits.acquire().await.ok();
                    self.fetch_market_with(m, req).await
                });
                join_all(tasks).await
            }
            (Pacing::Batched { batch_size, batch_delay }, _) => {
                let chunks: Vec<&[MarketDescriptor]> = markets.chunks(batch_size.max(1)).collect();
                let last = chunks.len().saturating_sub(1);
                let mut out = Vec::with_capacity(markets.len());
                for (i, chunk) in chunks.into_iter().enumerate() {
                    let results =
                        join_all(chunk.iter().map(|m| self.fetch_market_with(m, req))).await;
                    out.extend(results);
                    if i < last {
                        tokio::time::sleep(batch_delay).await;
                    }
                }
                out
            }
            // permits are always built for token-bucket pacing
            (Pacing::TokenBucket { .. }, None) => {
                join_all(markets.iter().map(|m| self.fetch_market_with(m, req))).await
            }
        }
    }

    /// Fetch `markets` for `query` under the configured pacing.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the query is blank.
    pub async fn fetch_markets(
        &self,
        query: &str,
        markets: &[MarketDescriptor],
    ) -> Result<Vec<MarketOutcome>, JoblensError> {
        let req = SearchRequest::new(query.trim(), self.cfg.page_size)?;
        Ok(self.run_markets(&req, markets).await)
    }
}
