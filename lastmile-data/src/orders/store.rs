//! HTTP-based `OrderStore` over the platform's REST API.
//!
//! The [`OrderStore`] trait is synchronous so the optimizer stays embeddable
//! in plain threads. This store bridges to asynchronous `reqwest` calls by
//! blocking on a Tokio runtime it owns.
//!
//! # Example
//!
//! ```no_run
//! use lastmile_core::{OrderId, OrderStore};
//! use lastmile_data::orders::HttpOrderStore;
//!
//! let store = HttpOrderStore::new("http://localhost:5000")?;
//! let records = store.resolve_orders(&[OrderId(1), OrderId(2)])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use lastmile_core::{OrderId, OrderRecord, OrderStore, OrderStoreError};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::api::OrdersResponse;

/// Error type for [`HttpOrderStore`] construction failures.
#[derive(Debug, Error)]
pub enum OrderStoreBuildError {
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid order API url {url}: {source}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for order API requests.
pub const DEFAULT_USER_AGENT: &str = "lastmile-orders/0.1";

/// Default base URL of the order API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the order listing endpoint.
const ORDERS_PATH: &str = "api/orders";

/// Configuration for [`HttpOrderStore`].
#[derive(Clone)]
pub struct HttpOrderStoreConfig {
    /// Base URL of the platform API (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Bearer token sent as `Authorization` when present.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for HttpOrderStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpOrderStoreConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for HttpOrderStoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            bearer_token: None,
        }
    }
}

impl HttpOrderStoreConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
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

    /// Authenticate requests with a bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// Order store backed by the platform's `GET /api/orders` endpoint.
///
/// Each lookup lists the pending orders and keeps those that were asked for;
/// identifiers the platform does not list are absent from the result.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the store blocks on its own runtime. Inside a
/// multi-threaded runtime it uses that runtime's handle with
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime, where
/// neither may block the calling thread, the lookup runs on its own runtime
/// from a scoped helper thread.
pub struct HttpOrderStore {
    client: Client,
    config: HttpOrderStoreConfig,
    orders_url: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpOrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpOrderStore")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("orders_url", &self.orders_url.as_str())
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpOrderStore {
    /// Create a store with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, OrderStoreBuildError> {
        Self::with_config(HttpOrderStoreConfig::new(base_url))
    }

    /// Create a store with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpOrderStoreConfig) -> Result<Self, OrderStoreBuildError> {
        let orders_url = build_orders_url(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(OrderStoreBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(OrderStoreBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            orders_url,
            runtime,
        })
    }

    /// URL queried for pending orders.
    #[must_use]
    pub fn orders_url(&self) -> &str {
        self.orders_url.as_str()
    }

    async fn fetch_orders_async(&self, ids: &[OrderId]) -> Result<Vec<OrderRecord>, OrderStoreError> {
        let url = self.orders_url.as_str();
        let mut request = self.client.get(self.orders_url.clone());
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(OrderStoreError::NotFound {
                url: url.to_owned(),
            });
        }
        let body: OrdersResponse = response
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .json()
            .await
            .map_err(|err| OrderStoreError::ParseError {
                message: err.to_string(),
            })?;

        let records = body.select(ids);
        log::debug!(
            "order API returned {} of {} requested orders",
            records.len(),
            ids.len()
        );
        Ok(records)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> OrderStoreError {
        if error.is_timeout() {
            return OrderStoreError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return OrderStoreError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        OrderStoreError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Build `{base}/api/orders?status=pending`, ignoring a trailing slash on the
/// base.
fn build_orders_url(base_url: &str) -> Result<Url, OrderStoreBuildError> {
    let joined = format!("{}/{ORDERS_PATH}", base_url.trim_end_matches('/'));
    let mut url = Url::parse(&joined).map_err(|source| OrderStoreBuildError::InvalidUrl {
        url: base_url.to_owned(),
        source,
    })?;
    url.query_pairs_mut().append_pair("status", "pending");
    Ok(url)
}

impl OrderStore for HttpOrderStore {
    fn resolve_orders(&self, ids: &[OrderId]) -> Result<Vec<OrderRecord>, OrderStoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.fetch_orders_async(ids)))
            }
            Ok(_) => self.resolve_on_helper_thread(ids),
            Err(_) => self.runtime.block_on(self.fetch_orders_async(ids)),
        }
    }
}

impl HttpOrderStore {
    /// Block on the owned runtime from a thread outside the caller's runtime.
    fn resolve_on_helper_thread(&self, ids: &[OrderId]) -> Result<Vec<OrderRecord>, OrderStoreError> {
        std::thread::scope(|scope| {
            scope
                .spawn(|| self.runtime.block_on(self.fetch_orders_async(ids)))
                .join()
                .unwrap_or_else(|_| {
                    Err(OrderStoreError::NetworkError {
                        url: self.orders_url.to_string(),
                        message: "order lookup thread panicked".to_owned(),
                    })
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://orders.example.com")]
    #[case("http://orders.example.com/")]
    fn orders_url_appends_endpoint_and_status(#[case] base: &str) {
        let store = HttpOrderStore::new(base).expect("store should build");

        assert_eq!(
            store.orders_url(),
            "http://orders.example.com/api/orders?status=pending"
        );
    }

    #[rstest]
    fn orders_url_keeps_path_prefix() {
        let store =
            HttpOrderStore::new("https://example.com/platform/").expect("store should build");

        assert_eq!(
            store.orders_url(),
            "https://example.com/platform/api/orders?status=pending"
        );
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case("/api")]
    fn invalid_base_url_is_rejected(#[case] base: &str) {
        let err = HttpOrderStore::new(base).expect_err("url should be rejected");

        assert!(matches!(err, OrderStoreBuildError::InvalidUrl { .. }));
    }

    #[rstest]
    fn empty_lookup_skips_the_request() {
        // Nothing listens on the discard port; an empty lookup never dials it.
        let store = HttpOrderStore::new("http://127.0.0.1:9").expect("store should build");

        let records = store.resolve_orders(&[]).expect("empty lookup succeeds");

        assert!(records.is_empty());
    }

    #[rstest]
    fn unreachable_service_is_a_network_failure() {
        let config = HttpOrderStoreConfig::new("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let store = HttpOrderStore::with_config(config).expect("store should build");

        let err = store
            .resolve_orders(&[OrderId(1)])
            .expect_err("nothing is listening");

        assert!(
            matches!(
                err,
                OrderStoreError::NetworkError { .. } | OrderStoreError::Timeout { .. }
            ),
            "expected a transport failure, got {err:?}"
        );
    }

    #[rstest]
    fn lookup_inside_current_thread_runtime_returns_an_error() {
        let config = HttpOrderStoreConfig::new("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let store = HttpOrderStore::with_config(config).expect("store should build");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");

        let outcome = runtime.block_on(async { store.resolve_orders(&[OrderId(1)]) });

        let err = outcome.expect_err("nothing is listening");
        assert!(
            matches!(
                err,
                OrderStoreError::NetworkError { .. } | OrderStoreError::Timeout { .. }
            ),
            "expected a transport failure, got {err:?}"
        );
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpOrderStoreConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0")
            .with_bearer_token("secret");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.bearer_token.as_deref(), Some("secret"));
        assert!(!format!("{config:?}").contains("secret"));
    }
}
