//! Error types for the cookie gateway.

use thiserror::Error;

use crate::error::TransportError;

/// Message the cookie endpoint answers with when no requested cookie is set.
pub const SESSION_NOT_FOUND_MESSAGE: &str = "Session not found. Please log in again.";

/// Message the cookie endpoint answers with for malformed `POST` bodies.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Errors returned by [`CookieGateway`](super::CookieGateway) operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway could not be reached or answered with an unexpected status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The gateway rejected the request body (missing or mismatched arrays).
    #[error("cookie gateway rejected request: {message}")]
    Validation {
        /// Message reported by the gateway.
        message: String,
    },

    /// None of the requested cookies are set.
    ///
    /// The gateway reports an empty lookup as an expired session rather than
    /// an empty result.
    #[error("{message}")]
    SessionNotFound {
        /// Message reported by the gateway.
        message: String,
    },
}

impl GatewayError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a session-not-found error with the standard message.
    #[must_use]
    pub fn session_not_found() -> Self {
        Self::SessionNotFound {
            message: SESSION_NOT_FOUND_MESSAGE.to_string(),
        }
    }
}
