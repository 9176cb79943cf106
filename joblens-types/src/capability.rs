use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for routing, errors, and telemetry.
///
/// These map one-to-one with upstream calls issued by the orchestrator and
/// allow consistent Display formatting in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Job-listing search for one market (sample + total count).
    Search,
    /// Salary histogram for one market.
    Histogram,
    /// Currency exchange-rate table.
    Rates,
    /// Full cross-market analytics aggregation.
    Analytics,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Histogram => "histogram",
            Self::Rates => "rates",
            Self::Analytics => "analytics",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
