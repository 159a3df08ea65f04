//! Outgoing request description and call results.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// How the client treats a request with respect to authentication.
///
/// Set by the caller; the client never infers it from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthRequirement {
    /// Public endpoint.
    #[default]
    None,
    /// Protected endpoint: a bearer token is attached before sending.
    Bearer,
    /// Login endpoint: tokens in a successful response are persisted.
    Login,
    /// Token refresh endpoint.
    Refresh,
}

/// A request to the remote API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Path relative to the API base URL, or an absolute URL.
    pub path: String,
    /// HTTP method.
    pub method: Method,
    /// Request headers, added on top of the transport defaults.
    pub headers: HeaderMap,
    /// JSON body.
    pub body: Option<serde_json::Value>,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// Authentication handling.
    pub auth: AuthRequirement,
    retried: bool,
}

impl ApiRequest {
    /// Creates a request with no body, query, or auth handling.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            headers: HeaderMap::new(),
            body: None,
            query: Vec::new(),
            auth: AuthRequirement::None,
            retried: false,
        }
    }

    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the authentication handling.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthRequirement) -> Self {
        self.auth = auth;
        self
    }

    /// Whether this request has already been resubmitted after a refresh.
    #[must_use]
    pub fn retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Sets `Authorization: Bearer <token>`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] when the token contains characters
    /// that cannot appear in a header.
    pub fn set_bearer(&mut self, token: &str) -> Result<(), AuthError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| AuthError::validation("access token is not a valid header value"))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// The bearer token currently attached, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; `Null` when empty, a string when not JSON.
    pub body: serde_json::Value,
}

/// Outcome of [`AuthClient::call_api`](super::AuthClient::call_api).
///
/// Exactly one arm is ever populated. Serializes with a `status` tag of
/// `"success"` or `"error"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResult<T> {
    /// The call succeeded.
    Success {
        /// Decoded response body.
        data: T,
    },
    /// The call failed.
    Error {
        /// User-facing error message.
        error: String,
    },
}

impl<T> ApiResult<T> {
    /// Creates an error result from a client error.
    #[must_use]
    pub fn from_error(error: &AuthError) -> Self {
        Self::Error {
            error: error.user_message(),
        }
    }

    /// True for the success arm.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The data, if the call succeeded.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    /// The error message, if the call failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error } => Some(error),
        }
    }

    /// Converts into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the error message for the error arm.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Error { error } => Err(error),
        }
    }
}
