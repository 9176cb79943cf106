#[cfg(feature = "test-adapters")]
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use joblens_core::{JoblensError, SalaryHistogram, SearchPage};
use serde::de::DeserializeOwned;
use url::Url;

use crate::models::{HistogramResponse, SearchResponse};

pub(crate) const CONNECTOR_NAME: &str = "joblens-adzuna";

/// Listings abstraction (so we can inject canned upstream answers in tests).
#[async_trait]
pub trait AdzunaListings: Send + Sync {
    /// First page of postings for `query` in the market served under `locale`.
    async fn search(
        &self,
        locale: &str,
        query: &str,
        page_size: u32,
    ) -> Result<SearchPage, JoblensError>;

    /// Salary histogram for `query` in the market served under `locale`.
    async fn histogram(&self, locale: &str, query: &str) -> Result<SalaryHistogram, JoblensError>;
}

/// Application credentials issued by Adzuna.
#[derive(Clone)]
pub struct Credentials {
    app_id: String,
    app_key: String,
}

impl Credentials {
    /// Pair an application id with its key.
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .finish()
    }
}

/// Production adapter talking to the Adzuna REST API over `reqwest`.
///
/// `reqwest::Client` is `Clone + Send + Sync` and pools connections internally.
#[derive(Clone, Debug)]
pub struct RealAdapter {
    http: reqwest::Client,
    base: Url,
    credentials: Credentials,
}

impl RealAdapter {
    /// Public Adzuna jobs API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.adzuna.com/v1/api/jobs";

    /// Adapter with a fresh HTTP client against the public API.
    ///
    /// # Errors
    /// Returns a connector error if the HTTP client cannot be constructed.
    pub fn new(credentials: Credentials) -> Result<Self, JoblensError> {
        Self::with_base_url(credentials, Self::DEFAULT_BASE_URL)
    }

    /// Adapter with a fresh HTTP client against `base_url`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unusable URL, or a connector error if the
    /// HTTP client cannot be constructed.
    pub fn with_base_url(credentials: Credentials, base_url: &str) -> Result<Self, JoblensError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| JoblensError::connector(CONNECTOR_NAME, e.to_string()))?;
        Self::with_client(http, credentials, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `base_url` does not parse or cannot carry path segments.
    pub fn with_client(
        http: reqwest::Client,
        credentials: Credentials,
        base_url: &str,
    ) -> Result<Self, JoblensError> {
        let base = parse_base(base_url)?;
        Ok(Self {
            http,
            base,
            credentials,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, JoblensError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| JoblensError::InvalidArg(format!("cannot extend {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<T, JoblensError> {
        let resp = self
            .http
            .get(url)
            .query(&[
                ("app_id", self.credentials.app_id.as_str()),
                ("app_key", self.credentials.app_key.as_str()),
            ])
            .query(params)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| JoblensError::connector(CONNECTOR_NAME, e.without_url().to_string()))?;
        decode(CONNECTOR_NAME, resp).await
    }
}

pub(crate) fn parse_base(base_url: &str) -> Result<Url, JoblensError> {
    let url = Url::parse(base_url.trim())
        .map_err(|e| JoblensError::InvalidArg(format!("base url {base_url:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(JoblensError::InvalidArg(format!(
            "base url {base_url:?} cannot carry a path"
        )));
    }
    Ok(url)
}

/// Map a response into `T`: non-2xx becomes `Http`, an undecodable body becomes `Data`.
pub(crate) async fn decode<T: DeserializeOwned>(
    connector: &'static str,
    resp: reqwest::Response,
) -> Result<T, JoblensError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(JoblensError::http(connector, status.as_u16()));
    }
    let body = resp
        .bytes()
        .await
        .map_err(|e| JoblensError::connector(connector, e.without_url().to_string()))?;
    serde_json::from_slice(&body)
        .map_err(|e| JoblensError::Data(format!("{connector}: malformed payload: {e}")))
}

#[async_trait]
impl AdzunaListings for RealAdapter {
    async fn search(
        &self,
        locale: &str,
        query: &str,
        page_size: u32,
    ) -> Result<SearchPage, JoblensError> {
        let url = self.endpoint(&[locale, "search", "1"])?;
        let page_size = page_size.to_string();
        let raw: SearchResponse = self
            .get_json(
                url,
                &[("what", query), ("results_per_page", page_size.as_str())],
            )
            .await?;
        Ok(raw.into())
    }

    async fn histogram(&self, locale: &str, query: &str) -> Result<SalaryHistogram, JoblensError> {
        let url = self.endpoint(&[locale, "histogram"])?;
        let raw: HistogramResponse = self.get_json(url, &[("what", query)]).await?;
        Ok(raw.into())
    }
}

#[cfg(feature = "test-adapters")]
impl dyn AdzunaListings {
    /// Build an `AdzunaListings` from two closures (tests only).
    ///
    /// The search closure receives `(locale, query, page_size)`, the histogram
    /// closure `(locale, query)`.
    pub fn from_fns<FS, FH>(search: FS, histogram: FH) -> Arc<dyn AdzunaListings>
    where
        FS: Send + Sync + 'static + Fn(&str, &str, u32) -> Result<SearchPage, JoblensError>,
        FH: Send + Sync + 'static + Fn(&str, &str) -> Result<SalaryHistogram, JoblensError>,
    {
        struct FnListings<FS, FH> {
            search: FS,
            histogram: FH,
        }
        #[async_trait]
        impl<FS, FH> AdzunaListings for FnListings<FS, FH>
        where
            FS: Send + Sync + 'static + Fn(&str, &str, u32) -> Result<SearchPage, JoblensError>,
            FH: Send + Sync + 'static + Fn(&str, &str) -> Result<SalaryHistogram, JoblensError>,
        {
            async fn search(
                &self,
                locale: &str,
                query: &str,
                page_size: u32,
            ) -> Result<SearchPage, JoblensError> {
                (self.search)(locale, query, page_size)
            }

            async fn histogram(
                &self,
                locale: &str,
                query: &str,
            ) -> Result<SalaryHistogram, JoblensError> {
                (self.histogram)(locale, query)
            }
        }
        Arc::new(FnListings { search, histogram })
    }
}
