//! HTTP catalog access against the backend's REST interface.
//!
//! [`HttpCatalogClient`] is the asynchronous client used by
//! [`CatalogTask`](super::CatalogTask). [`HttpCatalogSource`] wraps it for
//! the synchronous [`CatalogSource`] trait by blocking on a Tokio runtime it
//! owns, keeping the scoring core embeddable in synchronous callers.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use eventwise_core::{Catalog, CatalogError, CatalogSource, Category, Event, EventRecord};
use log::debug;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::AsyncCatalogSource;

/// Default user agent for backend requests.
pub const DEFAULT_USER_AGENT: &str = "eventwise-catalog/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const EVENTS_PATH: &str = "/rest/v1/events?select=*,categories(name,icon)&order=date.asc";
const CATEGORIES_PATH: &str = "/rest/v1/categories?select=*&order=name.asc";
const API_KEY_HEADER: &str = "apikey";

/// Errors raised while building an HTTP catalog client or source.
#[derive(Debug, Error)]
pub enum HttpSourceBuildError {
    /// The API key cannot be sent as an HTTP header.
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey(#[source] InvalidHeaderValue),
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpCatalogClient`] and [`HttpCatalogSource`].
#[derive(Clone)]
pub struct HttpCatalogSourceConfig {
    /// Backend base URL (e.g., `"https://project.supabase.co"`).
    pub base_url: String,
    /// Anonymous API key sent as `apikey` and as a bearer token.
    pub api_key: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for HttpCatalogSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogSourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpCatalogSourceConfig {
    /// Create a configuration for the given backend and key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// URL listing every event joined with its category, oldest first.
    #[must_use]
    pub fn events_url(&self) -> String {
        format!("{}{EVENTS_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// URL listing every category by name.
    #[must_use]
    pub fn categories_url(&self) -> String {
        format!("{}{CATEGORIES_PATH}", self.base_url.trim_end_matches('/'))
    }
}

/// Asynchronous backend client.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    config: HttpCatalogSourceConfig,
}

impl HttpCatalogClient {
    /// Build a client that authenticates every request with the configured
    /// API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: HttpCatalogSourceConfig) -> Result<Self, HttpSourceBuildError> {
        let mut headers = HeaderMap::new();
        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(HttpSourceBuildError::InvalidApiKey)?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(HttpSourceBuildError::InvalidApiKey)?;
        bearer.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(HttpSourceBuildError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpCatalogSourceConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        response
            .json()
            .await
            .map_err(|err| CatalogError::ParseError {
                message: err.to_string(),
            })
    }

    /// Convert a reqwest error to a `CatalogError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> CatalogError {
        if error.is_timeout() {
            return CatalogError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return CatalogError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return CatalogError::ParseError {
                message: error.to_string(),
            };
        }

        CatalogError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl AsyncCatalogSource for HttpCatalogClient {
    async fn fetch_events(&self) -> Result<Catalog, CatalogError> {
        let url = self.config.events_url();
        let records: Vec<EventRecord> =
            retry_transient_once(&url, || self.get_json(&url)).await?;
        debug!("fetched {} events from {url}", records.len());
        Ok(records.into_iter().map(Event::from).collect())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let url = self.config.categories_url();
        retry_transient_once(&url, || self.get_json(&url)).await
    }
}

/// Run `attempt`, repeating it once when the first failure is transient.
pub(crate) async fn retry_transient_once<T, F, Fut>(
    url: &str,
    mut attempt: F,
) -> Result<T, CatalogError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    match attempt().await {
        Err(err) if err.is_transient() => {
            debug!("retrying {url} after transient error: {err}");
            attempt().await
        }
        outcome => outcome,
    }
}

/// Synchronous [`CatalogSource`] backed by [`HttpCatalogClient`].
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the source uses its own
/// stored runtime. When called from within a multi-threaded Tokio runtime it
/// uses that runtime's handle with [`tokio::task::block_in_place`]. Inside a
/// `current_thread` runtime it falls back to its own runtime, which blocks
/// the caller's executor for the duration of the request.
pub struct HttpCatalogSource {
    client: HttpCatalogClient,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpCatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogSource")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpCatalogSource {
    /// Create a source for `base_url` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, HttpSourceBuildError> {
        Self::with_config(HttpCatalogSourceConfig::new(base_url, api_key))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpCatalogSourceConfig) -> Result<Self, HttpSourceBuildError> {
        let client = HttpCatalogClient::new(config)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(HttpSourceBuildError::Runtime)?;
        Ok(Self { client, runtime })
    }

    /// Borrow the underlying asynchronous client.
    #[must_use]
    pub const fn client(&self) -> &HttpCatalogClient {
        &self.client
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch_events(&self) -> Result<Catalog, CatalogError> {
        self.block_on(AsyncCatalogSource::fetch_events(&self.client))
    }

    fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.block_on(AsyncCatalogSource::fetch_categories(&self.client))
    }
}
