//! joblens-middleware
//!
//! Connector wrappers applied between the orchestrator and raw upstream
//! connectors, plus the generic TTL cache used for finished reports.

mod builder;
mod cache;
mod rate_limit;
mod retry;
mod timeout;

pub use crate::builder::ConnectorBuilder;
pub use crate::cache::{CacheMiddleware, CachingConnector, TtlCache};
pub use crate::rate_limit::{RateLimitMiddleware, RateLimitedConnector, TokenBucket};
pub use crate::retry::{
    RetryMiddleware, RetryingConnector, backoff_ms, jitter_wait, with_retry,
};
pub use crate::timeout::{TimeoutConnector, TimeoutMiddleware, provider_call_with_timeout};
