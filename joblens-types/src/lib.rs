//! JobLens data transfer objects, configuration primitives, and the unified error type.
#![warn(missing_docs)]

mod capability;
mod config;
mod error;
mod market;
mod reports;

pub use capability::Capability;
pub use config::{CacheConfig, JoblensConfig, Pacing, RetryConfig};
pub use error::JoblensError;
pub use market::MarketDescriptor;
pub use reports::{
    AnalyticsReport, DemandEntry, JobTypeDistribution, MarketReport, SalaryEntry, SalaryEstimate,
    SampleDescription, SkillCount,
};
