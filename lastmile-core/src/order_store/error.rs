use thiserror::Error;

/// Errors from [`crate::OrderStore::resolve_orders`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderStoreError {
    /// The order collection does not exist at the configured location.
    #[error("order collection not found at {url}")]
    NotFound {
        /// Location that was queried.
        url: String,
    },
    /// The store did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Location that was queried.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The store answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    HttpError {
        /// Location that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The store could not be reached.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Location that was queried.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The store's answer could not be decoded.
    #[error("failed to parse order data: {message}")]
    ParseError {
        /// Error detail.
        message: String,
    },
}
