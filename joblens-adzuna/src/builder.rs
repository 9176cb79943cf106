use std::sync::Arc;

use joblens_core::connector::JobConnector;
use joblens_middleware::{ConnectorBuilder, TokenBucket};
use joblens_types::{CacheConfig, JoblensError, RetryConfig};

use crate::AdzunaConnector;

/// Builder type alias specialized for Adzuna connectors.
pub type AdzunaConnectorBuilder = ConnectorBuilder;

impl AdzunaConnector {
    /// Returns a builder around `self` with no middleware configured.
    ///
    /// Customize with the builder methods before calling `.build()`.
    #[must_use]
    pub fn into_builder(self) -> AdzunaConnectorBuilder {
        let raw: Arc<dyn JobConnector> = Arc::new(self);
        ConnectorBuilder::new(raw)
    }

    /// Returns a builder with conservative defaults for the public API:
    /// a short listing cache, two attempts on transient failures, and a
    /// token bucket of one call per second with a burst of two.
    ///
    /// # Errors
    /// Propagates token-bucket validation errors.
    pub fn rate_limited(self) -> Result<AdzunaConnectorBuilder, JoblensError> {
        let bucket = TokenBucket::new(1.0, 2)?;
        Ok(self
            .into_builder()
            .with_cache(CacheConfig::listings())
            .with_retry(RetryConfig::default())
            .with_rate_limit(Arc::new(bucket)))
    }
}
