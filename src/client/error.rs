//! Error types for the authenticated API client.

use thiserror::Error;

use crate::error::TransportError;
use crate::gateway::{GatewayError, SESSION_NOT_FOUND_MESSAGE};

/// Message used when a failure carries nothing more specific to show.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Errors surfaced by [`AuthClient`](super::AuthClient) operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Network failure, timeout, or non-2xx answer from any HTTP call.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// No usable token is available to satisfy a protected call.
    #[error("{}", SESSION_NOT_FOUND_MESSAGE)]
    SessionExpired,

    /// A request was rejected before reaching the network.
    #[error("invalid request: {message}")]
    Validation {
        /// What was wrong with the request.
        message: String,
    },

    /// A response arrived but did not have the expected shape.
    #[error("unexpected response: {reason}")]
    Unexpected {
        /// Details for logs; callers see [`UNEXPECTED_ERROR_MESSAGE`].
        reason: String,
    },
}

impl AuthError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an unexpected-response error.
    pub fn unexpected(reason: impl Into<String>) -> Self {
        Self::Unexpected {
            reason: reason.into(),
        }
    }

    /// HTTP status of the underlying failure, if it was a non-2xx response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(error) => error.status(),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Prefers the server's `message` field, then the error's own text, and
    /// falls back to [`UNEXPECTED_ERROR_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(error) => error
                .server_message()
                .map_or_else(|| error.to_string(), str::to_string),
            Self::SessionExpired => SESSION_NOT_FOUND_MESSAGE.to_string(),
            Self::Validation { message } => message.clone(),
            Self::Unexpected { .. } => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<GatewayError> for AuthError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Transport(error) => Self::Transport(error),
            GatewayError::Validation { message } => Self::Validation { message },
            GatewayError::SessionNotFound { .. } => Self::SessionExpired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_message() {
        let error = AuthError::from(TransportError::http_status(
            "https://dummyjson.com/auth/login",
            400,
            Some("Invalid credentials".to_string()),
        ));
        assert_eq!(error.user_message(), "Invalid credentials");
        assert_eq!(error.status(), Some(400));
    }

    #[test]
    fn test_user_message_falls_back_to_error_text() {
        let error = AuthError::from(TransportError::http_status(
            "https://dummyjson.com/auth/me",
            500,
            None,
        ));
        assert_eq!(
            error.user_message(),
            "HTTP 500 requesting https://dummyjson.com/auth/me"
        );
    }

    #[test]
    fn test_user_message_for_unexpected_is_generic() {
        let error = AuthError::unexpected("missing field `id`");
        assert_eq!(error.user_message(), UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn test_session_expired_message() {
        assert_eq!(
            AuthError::SessionExpired.user_message(),
            "Session not found. Please log in again."
        );
    }

    #[test]
    fn test_gateway_errors_map_onto_taxonomy() {
        assert!(matches!(
            AuthError::from(GatewayError::session_not_found()),
            AuthError::SessionExpired
        ));
        assert!(matches!(
            AuthError::from(GatewayError::validation("Invalid request body")),
            AuthError::Validation { .. }
        ));
        assert!(matches!(
            AuthError::from(GatewayError::from(TransportError::timeout("x"))),
            AuthError::Transport(TransportError::Timeout { .. })
        ));
    }
}
