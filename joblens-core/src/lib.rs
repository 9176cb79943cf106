//! joblens-core
//!
//! Core types, traits, and analysis primitives shared across the joblens ecosystem.
//!
//! - `types`: data structures exchanged between connectors and the orchestrator.
//! - `connector`: the `JobConnector` trait and capability provider traits.
//! - `markets`: the fixed registry of supported job markets.
//! - `salary`, `remote`, `skills`: per-market and cross-market analysis.
//!
//! Async runtime (Tokio)
//! ---------------------
//! `clock::TokioClock` reads Tokio's time driver so that caches and rate
//! limiters observe paused time in tests. Code using it must run under a
//! Tokio 1.x runtime.
#![warn(missing_docs)]

/// Injectable monotonic clocks.
pub mod clock;
/// Connector capability traits and the primary `JobConnector` interface.
pub mod connector;
/// Supported markets.
pub mod markets;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
/// Remote-work classification.
pub mod remote;
/// Salary estimation and currency conversion.
pub mod salary;
/// Skill-frequency extraction.
pub mod skills;
pub mod types;

pub use clock::{Clock, ManualClock, TokioClock};
pub use connector::{HistogramProvider, JobConnector, RateProvider, SearchProvider};
pub use markets::{find_market, list_markets};
pub use middleware::Middleware;
pub use types::*;

/// Integer percentage `round(100 * part / whole)`, or 0 when `whole` is 0.
#[must_use]
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}
