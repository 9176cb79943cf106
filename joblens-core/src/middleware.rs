//! Middleware trait for wrapping `JobConnector` implementations.

use std::sync::Arc;

use crate::connector::JobConnector;

/// Trait implemented by connector middleware layers.
///
/// A middleware consumes an inner `JobConnector` and returns a wrapped
/// connector that augments its behavior (caching, pacing, retries).
pub trait Middleware: Send + Sync {
    /// Wrap `inner` and return the wrapped connector.
    fn apply(self: Box<Self>, inner: Arc<dyn JobConnector>) -> Arc<dyn JobConnector>;

    /// Human-readable middleware name for introspection/logging.
    fn name(&self) -> &'static str;

    /// Configuration snapshot for inspection.
    fn config_json(&self) -> serde_json::Value;
}
