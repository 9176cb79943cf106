//! JobLens aggregates job-market signals for one search term across many
//! national markets into a single comparable report.
//!
//! Overview
//! - Fans out to one job-listing connector per market under a pacing policy
//!   (fixed batches or a token bucket with a concurrency cap).
//! - Tolerates partial failure: each upstream call is isolated, bounded by a
//!   timeout, and recorded as a warning when it fails.
//! - Reconciles sampled posting salaries with histogram salaries and converts
//!   them into a base currency through a cached exchange-rate table.
//! - Caches finished reports so repeat queries never touch the upstreams.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use joblens::Joblens;
//!
//! let joblens = Joblens::builder()
//!     .with_connector(Arc::new(AdzunaConnector::new(app_id, app_key)))
//!     .with_rate_provider(Arc::new(ExchangeRateConnector::default()))
//!     .build()?;
//! let report = joblens.analytics("rust developer").await?;
//! println!("{} listings", report.total_listings);
//! ```
#![warn(missing_docs)]

mod core;
mod rates;
mod router;

pub use crate::core::{Joblens, JoblensBuilder, tag_err};
pub use crate::rates::ExchangeRates;
pub use crate::router::reduce::{ReduceOptions, job_type_distribution, reduce};
pub use crate::router::util::{collapse_errors, report_cache_key};

pub use joblens_core::{
    AnalyticsReport, CacheConfig, JobConnector, JoblensConfig, JoblensError, MarketDescriptor,
    MarketOutcome, Pacing, RateProvider, RetryConfig,
};
