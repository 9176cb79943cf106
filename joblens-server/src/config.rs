//! Server configuration derived from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use joblens::{JoblensError, RetryConfig};

/// Runtime settings for the HTTP server and the upstream connectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Adzuna credentials; both must be present to serve analytics.
    pub adzuna_app_id: Option<String>,
    pub adzuna_app_key: Option<String>,
    pub adzuna_base_url: String,
    pub exchange_rate_base_url: String,
    pub base_currency: String,
    pub provider_timeout: Duration,
    /// Attempts per upstream call; 1 disables retries.
    pub retry_attempts: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn lookup_str(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    get(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn lookup_or(get: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup_str(get, name).unwrap_or_else(|| default.to_string())
}

fn lookup_parse<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    lookup_str(get, name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through `get`; unset, blank, or unparsable values fall back to defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind: lookup_or(&get, "JOBLENS_BIND", "0.0.0.0"),
            port: lookup_parse(&get, "PORT", 8080),
            adzuna_app_id: lookup_str(&get, "ADZUNA_APP_ID"),
            adzuna_app_key: lookup_str(&get, "ADZUNA_APP_KEY"),
            adzuna_base_url: lookup_or(
                &get,
                "ADZUNA_BASE_URL",
                joblens_adzuna::adapter::RealAdapter::DEFAULT_BASE_URL,
            ),
            exchange_rate_base_url: lookup_or(
                &get,
                "EXCHANGE_RATE_BASE_URL",
                joblens_adzuna::ExchangeRateConnector::DEFAULT_BASE_URL,
            ),
            base_currency: lookup_or(&get, "JOBLENS_BASE_CURRENCY", "USD").to_ascii_uppercase(),
            provider_timeout: Duration::from_secs(
                lookup_parse(&get, "JOBLENS_PROVIDER_TIMEOUT_SECS", 30_u64).max(1),
            ),
            retry_attempts: lookup_parse(&get, "JOBLENS_RETRY_ATTEMPTS", 1_u32).max(1),
        }
    }

    /// Address the listener binds to.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `bind` and `port` do not form a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, JoblensError> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| JoblensError::InvalidArg(format!("bind address {}: {e}", self.bind)))
    }

    /// Retry policy for upstream calls.
    #[must_use]
    pub fn retry(&self) -> RetryConfig {
        if self.retry_attempts <= 1 {
            RetryConfig::disabled()
        } else {
            RetryConfig {
                max_attempts: self.retry_attempts,
                ..RetryConfig::default()
            }
        }
    }
}
