//! Exchange-rate connector backed by an `exchangerate-api`-style endpoint.

use std::time::Duration;

use async_trait::async_trait;
use joblens_core::connector::RateProvider;
use joblens_core::{JoblensError, RateTable};
use url::Url;

use crate::adapter::{decode, parse_base};
use crate::models::LatestRatesResponse;

const RATES_NAME: &str = "joblens-exchange-rates";

/// Fetches `{base_url}/latest/{BASE}` and exposes it as a `RateProvider`.
#[derive(Clone, Debug)]
pub struct ExchangeRateConnector {
    http: reqwest::Client,
    base: Url,
}

impl ExchangeRateConnector {
    /// Public endpoint root.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.exchangerate-api.com/v4";

    /// Connector against the public endpoint.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be constructed.
    pub fn new_default() -> Result<Self, JoblensError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Connector against `base_url`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unusable URL, or a connector error if the
    /// HTTP client cannot be constructed.
    pub fn with_base_url(base_url: &str) -> Result<Self, JoblensError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| JoblensError::connector(RATES_NAME, e.to_string()))?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `base_url` is unusable.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, JoblensError> {
        Ok(Self {
            http,
            base: parse_base(base_url)?,
        })
    }

    fn latest_url(&self, base: &str) -> Result<Url, JoblensError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| JoblensError::InvalidArg(format!("cannot extend {}", self.base)))?
            .pop_if_empty()
            .extend(["latest", base]);
        Ok(url)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateConnector {
    fn name(&self) -> &'static str {
        RATES_NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "joblens_adzuna::rates::latest", skip(self))
    )]
    async fn latest(&self, base: &str) -> Result<RateTable, JoblensError> {
        let base = base.trim().to_ascii_uppercase();
        if base.is_empty() {
            return Err(JoblensError::InvalidArg("base currency is required".into()));
        }
        let resp = self
            .http
            .get(self.latest_url(&base)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| JoblensError::connector(RATES_NAME, e.without_url().to_string()))?;
        let raw: LatestRatesResponse = decode(RATES_NAME, resp).await?;
        Ok(raw.into_table(&base))
    }
}
