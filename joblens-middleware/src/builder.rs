//! Builder for composing connectors with middleware layers.
//!
//! # Middleware Ordering Convention
//!
//! Middleware layers form an "onion" around the raw connector. The built-in
//! layers always nest in the same order regardless of the order they were
//! added in:
//!
//! ```text
//! User Request
//!     ↓
//! CachingConnector      (hits never reach the layers below)
//!     ↓
//! RetryingConnector     (each attempt goes through the limiter)
//!     ↓
//! RateLimitedConnector  (one token per upstream call)
//!     ↓
//! TimeoutConnector      (deadline for each individual attempt)
//!     ↓
//! Raw Connector         (e.g. Adzuna, makes the actual HTTP calls)
//! ```
//!
//! The `layers` vector stores middleware in **outermost-first** order and is
//! applied in reverse during `build()`. Custom layers added with
//! [`ConnectorBuilder::layer`] go outside everything else.

use std::sync::Arc;
use std::time::Duration;

use joblens_core::Middleware;
use joblens_core::connector::JobConnector;
use joblens_core::{CacheConfig, Clock, RetryConfig};
use serde_json::json;

use crate::cache::CacheMiddleware;
use crate::rate_limit::{RateLimitMiddleware, TokenBucket};
use crate::retry::RetryMiddleware;
use crate::timeout::TimeoutMiddleware;

const CACHE: &str = "CachingMiddleware";
const RETRY: &str = "RetryingConnector";
const RATE_LIMIT: &str = "RateLimitedConnector";
const TIMEOUT: &str = "TimeoutConnector";

fn rank(name: &str) -> usize {
    match name {
        CACHE => 1,
        RETRY => 2,
        RATE_LIMIT => 3,
        TIMEOUT => 4,
        _ => 0,
    }
}

/// Generic middleware builder for composing a connector with layered wrappers.
///
/// See [module-level documentation](self) for details on middleware ordering.
pub struct ConnectorBuilder {
    raw: Arc<dyn JobConnector>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl ConnectorBuilder {
    /// Create a new builder from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn JobConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Replace any layer with the same name and insert `layer` at its ranked position.
    fn insert_ranked(mut self, layer: Box<dyn Middleware>) -> Self {
        let name = layer.name();
        self.layers.retain(|m| m.name() != name);
        let r = rank(name);
        let pos = self
            .layers
            .iter()
            .position(|m| rank(m.name()) > r)
            .unwrap_or(self.layers.len());
        self.layers.insert(pos, layer);
        self
    }

    fn without(mut self, name: &str) -> Self {
        self.layers.retain(|m| m.name() != name);
        self
    }

    /// Add or replace raw-response caching.
    #[must_use]
    pub fn with_cache(self, cfg: CacheConfig) -> Self {
        self.insert_ranked(Box::new(CacheMiddleware::new(cfg)))
    }

    /// Add or replace raw-response caching driven by an explicit clock.
    #[must_use]
    pub fn with_cache_clock(self, cfg: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        self.insert_ranked(Box::new(CacheMiddleware::new(cfg).with_clock(clock)))
    }

    /// Remove caching if present.
    #[must_use]
    pub fn without_cache(self) -> Self {
        self.without(CACHE)
    }

    /// Add or replace bounded retries. A single-attempt config removes the layer.
    #[must_use]
    pub fn with_retry(self, cfg: RetryConfig) -> Self {
        if cfg.max_attempts <= 1 {
            return self.without(RETRY);
        }
        self.insert_ranked(Box::new(RetryMiddleware::new(cfg)))
    }

    /// Add or replace token-bucket pacing of upstream calls.
    #[must_use]
    pub fn with_rate_limit(self, bucket: Arc<TokenBucket>) -> Self {
        self.insert_ranked(Box::new(RateLimitMiddleware::new(bucket)))
    }

    /// Remove pacing if present.
    #[must_use]
    pub fn without_rate_limit(self) -> Self {
        self.without(RATE_LIMIT)
    }

    /// Add or replace the per-call deadline.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.insert_ranked(Box::new(TimeoutMiddleware::new(timeout)))
    }

    /// Add an arbitrary middleware layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Names and configuration of the stack, outermost first, ending with the
    /// raw connector.
    #[must_use]
    pub fn describe(&self) -> Vec<(&'static str, serde_json::Value)> {
        let mut out: Vec<_> = self
            .layers
            .iter()
            .map(|l| (l.name(), l.config_json()))
            .collect();
        out.push(("RawConnector", json!({ "name": self.raw.name() })));
        out
    }

    /// Build the wrapped connector, applying layers innermost first.
    #[must_use]
    pub fn build(self) -> Arc<dyn JobConnector> {
        let mut acc: Arc<dyn JobConnector> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            #[cfg(feature = "tracing")]
            tracing::debug!(layer = m.name(), "applying connector middleware");
            acc = m.apply(acc);
        }
        acc
    }
}
