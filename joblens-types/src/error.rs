use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the joblens workspace.
///
/// This wraps argument validation errors, connector-tagged failures, upstream
/// HTTP statuses, timeouts, and an aggregate for calls that failed together.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum JoblensError {
    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "histogram").
        capability: String,
    },

    /// Issues with the returned or expected data (missing fields, bad JSON, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An upstream answered with a non-success HTTP status.
    #[error("{connector} returned HTTP {status}")]
    Http {
        /// Connector name that issued the request.
        connector: String,
        /// HTTP status code returned by the upstream.
        status: u16,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),

    /// A resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "histogram for de".
        what: String,
    },

    /// Every call attempted for one unit of work failed; contains the individual failures.
    #[error("all providers failed: {0:?}")]
    AllProvidersFailed(Vec<JoblensError>),

    /// An individual upstream call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "search", "histogram", "rates").
        capability: String,
    },

    /// A failure scoped to one market; wraps the underlying error.
    #[error("{market}: {error}")]
    Market {
        /// Market code the failure belongs to.
        market: String,
        /// Underlying failure.
        error: Box<JoblensError>,
    },

    /// The request rate exceeds the configured rate limit.
    #[error("rate limit exceeded: limit={limit} window_ms={window_ms}")]
    RateLimitExceeded {
        /// Allowed number of requests in the window.
        limit: u64,
        /// Window length in milliseconds.
        window_ms: u64,
    },
}

impl JoblensError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `Http` error for a non-success upstream status.
    pub fn http(connector: impl Into<String>, status: u16) -> Self {
        Self::Http {
            connector: connector.into(),
            status,
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: scope an error to a market code.
    pub fn for_market(market: impl Into<String>, error: Self) -> Self {
        Self::Market {
            market: market.into(),
            error: Box::new(error),
        }
    }

    /// Returns true when a repeated attempt could plausibly succeed.
    ///
    /// Timeouts, opaque connector failures, throttling, and 5xx/429 statuses are
    /// transient. Argument, data, and not-found problems are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ProviderTimeout { .. }
            | Self::Connector { .. }
            | Self::RateLimitExceeded { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::AllProvidersFailed(inner) => inner.iter().any(Self::is_retryable),
            Self::Market { error, .. } => error.is_retryable(),
            _ => false,
        }
    }

    /// Flatten nested `AllProvidersFailed` structures into a plain vector.
    ///
    /// This preserves other error variants as-is and unwraps recursively.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllProvidersFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
