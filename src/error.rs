//! Transport-level error shared by the cookie gateway and the API client.
//!
//! Every HTTP call in this crate (cookie endpoint, remote auth API, refresh,
//! retried requests) reports failures through [`TransportError`], so callers
//! can inspect the status code and server message uniformly.

use thiserror::Error;

/// Errors raised while performing a single HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request URL could not be built from the base URL and path.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The URL (or path) that failed to parse.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-2xx response.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The `message` field of the JSON error body, if the server sent one.
        message: Option<String>,
    },

    /// Response body could not be decoded into the expected shape.
    #[error("invalid response body from {url}: {reason}")]
    Decode {
        /// The URL whose body failed to decode.
        url: String,
        /// Description of the decoding failure.
        reason: String,
    },
}

impl TransportError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Classifies a reqwest error, splitting out timeouts.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16, message: Option<String>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            message,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code when the failure was a non-2xx response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the server-provided error message, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Pulls the `message` string out of a JSON error body.
pub(crate) fn extract_message(body: &serde_json::Value) -> Option<String> {
    body.get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}
