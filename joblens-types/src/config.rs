//! Configuration types shared across the orchestrator, middleware, and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Capacity and time-to-live for one cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of live entries; inserting into a full cache evicts the
    /// oldest-inserted entry.
    pub capacity: usize,
    /// Lifetime of an entry. A zero TTL disables caching entirely.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Defaults for the aggregate report cache: 200 entries, 15 minutes.
    #[must_use]
    pub const fn reports() -> Self {
        Self {
            capacity: 200,
            ttl: Duration::from_secs(15 * 60),
        }
    }

    /// Defaults for raw per-market listing responses: 200 entries, 5 minutes.
    #[must_use]
    pub const fn listings() -> Self {
        Self {
            capacity: 200,
            ttl: Duration::from_secs(5 * 60),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::reports()
    }
}

/// How market fetches are paced to stay under upstream rate ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pacing {
    /// Fixed-size batches fetched concurrently with a pause between batches.
    Batched {
        /// Markets fetched concurrently per batch (>= 1).
        batch_size: usize,
        /// Pause inserted between consecutive batches (not after the last one).
        batch_delay: Duration,
    },
    /// Semaphore-capped concurrency combined with a token bucket.
    TokenBucket {
        /// Maximum number of market fetches in flight at once (>= 1).
        max_concurrency: usize,
        /// Sustained refill rate of the bucket.
        requests_per_second: f64,
        /// Bucket capacity; how many fetches may start back-to-back.
        burst: u32,
    },
}

impl Default for Pacing {
    fn default() -> Self {
        Self::Batched {
            batch_size: 2,
            batch_delay: Duration::from_millis(1200),
        }
    }
}

/// Bounded retry policy applied per upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one. `1` disables retries.
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds.
    pub min_backoff_ms: u64,
    /// Upper bound for any single retry delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor applied after each failed attempt (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl RetryConfig {
    /// A policy that makes exactly one attempt.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            max_attempts: 1,
            min_backoff_ms: 0,
            max_backoff_ms: 0,
            factor: 1,
            jitter_percent: 0,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            min_backoff_ms: 500,
            max_backoff_ms: 4_000,
            factor: 2,
            jitter_percent: 20,
        }
    }
}

/// Global configuration for the `Joblens` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoblensConfig {
    /// Currency all cross-market salary comparisons are normalized into.
    pub base_currency: String,
    /// Postings requested per market search call.
    pub page_size: u32,
    /// Upper bound on sample descriptions kept per market in the report.
    pub max_descriptions: usize,
    /// Number of skills kept in the report's skill ranking.
    pub top_skills: usize,
    /// Pause between the search and histogram calls for the same market.
    pub market_call_gap: Duration,
    /// Caller-side deadline for each individual upstream call.
    pub provider_timeout: Duration,
    /// Pacing of market fetches across the registry.
    pub pacing: Pacing,
    /// Cache settings for finished analytics reports.
    pub report_cache: CacheConfig,
    /// Lifetime of a fetched exchange-rate table.
    pub rates_ttl: Duration,
}

impl Default for JoblensConfig {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
            page_size: 50,
            max_descriptions: 50,
            top_skills: 8,
            market_call_gap: Duration::from_millis(300),
            provider_timeout: Duration::from_secs(30),
            pacing: Pacing::default(),
            report_cache: CacheConfig::reports(),
            rates_ttl: Duration::from_secs(60 * 60),
        }
    }
}
