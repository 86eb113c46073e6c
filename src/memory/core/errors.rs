//! Error types for the memory gateway.

use thiserror::Error;

/// Errors raised by an index backend client.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The index answered with a non-success status.
    #[error("index returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the index.
        body: String,
    },
    /// Request or response body could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Index host could not be turned into an endpoint URL.
    #[error("invalid index url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The client was closed during shutdown.
    #[error("index client `{0}` is closed")]
    Closed(String),
}

/// Convenience result alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors raised by a text classifier.
///
/// These never reach an HTTP caller; the gate absorbs them.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The classifier answered with a non-success status.
    #[error("classifier returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the classifier.
        body: String,
    },
    /// The classifier returned no text.
    #[error("classifier returned no output")]
    EmptyResponse,
    /// The blocking task running the classifier did not complete.
    #[error("classifier task failed: {0}")]
    Task(String),
}

/// Gateway error type surfaced to request handlers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Client supplied an unusable query.
    #[error("{0}")]
    InvalidQuery(String),
    /// An index read or write failed.
    #[error("backend error: {0}")]
    Backend(#[from] IndexError),
    /// Invalid or missing configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// I/O error (listener bind, serve loop).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Whether the error was caused by the client rather than a collaborator.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }
}

/// Convenience result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
