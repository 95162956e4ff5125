//! Error types for the Domo API client.
//!
//! Every failure surfaced by this crate is one of the variants of
//! [`Error`]. Network-library errors are translated at the transport
//! boundary and never escape as-is.

use std::time::Duration;

use thiserror::Error;

/// A specialized `Result` type for Domo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Domo API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied parameter violates a documented constraint.
    ///
    /// Detected locally before any network call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP 401/403, or a non-200 response from the OAuth token endpoint.
    #[error("Authentication failed (HTTP {status}): {body}")]
    Auth {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// HTTP 404.
    #[error("Not found: {path}")]
    NotFound {
        /// The request path (without base URL)
        path: String,
    },

    /// HTTP 429.
    #[error(
        "Rate limit exceeded{}",
        .retry_after.map(|secs| format!("; retry after {secs}s")).unwrap_or_default()
    )]
    RateLimited {
        /// Seconds to wait, parsed from a numeric `Retry-After` header
        retry_after: Option<f64>,
    },

    /// Any other HTTP error status, an oversized response, or a body that
    /// could not be interpreted.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable summary
        message: String,
        /// Raw response body for debugging
        body: String,
    },

    /// The request exceeded the configured timeout.
    #[error("Request to {path} timed out after {}s", .timeout.as_secs_f64())]
    Timeout {
        /// The request path (without base URL)
        path: String,
        /// The configured request timeout
        timeout: Duration,
    },

    /// The connection could not be established or was interrupted.
    #[error("Connection error for {path}: {reason}")]
    Connection {
        /// The request path (without base URL)
        path: String,
        /// Description of the underlying failure
        reason: String,
    },
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried by the caller.
    ///
    /// The transport itself never retries.
    ///
    /// # Example
    ///
    /// ```
    /// use domo_sdk::Error;
    ///
    /// let err = Error::RateLimited { retry_after: Some(30.0) };
    /// assert!(err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimited { .. } | Error::Timeout { .. } | Error::Connection { .. } => true,
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth { .. })
    }

    /// Returns `true` if this error indicates a client-side issue.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Validation(_) | Error::NotFound { .. } | Error::Auth { .. } => true,
            Error::RateLimited { .. } => true,
            Error::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// The HTTP status associated with this error, when one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(404),
            Error::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// The server-provided back-off hint for rate-limited requests.
    ///
    /// `None` when the hint is absent, negative, or too large for a
    /// [`Duration`].
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited {
                retry_after: Some(secs),
            } => Duration::try_from_secs_f64(*secs).ok(),
            _ => None,
        }
    }

    /// Translate a network-library failure for the request to `path`.
    pub(crate) fn from_transport(err: reqwest::Error, path: &str, timeout: Duration) -> Self {
        if err.is_timeout() {
            Error::Timeout {
                path: path.to_string(),
                timeout,
            }
        } else if err.is_builder() {
            Error::Validation(format!("could not build request for {path}: {err}"))
        } else {
            Error::Connection {
                path: path.to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// A successful response whose JSON payload did not have the expected shape.
    pub(crate) fn unexpected_payload(expected: &str, body: &serde_json::Value) -> Self {
        Error::Api {
            status: 200,
            message: format!("expected {expected} in response"),
            body: body.to_string(),
        }
    }
}
