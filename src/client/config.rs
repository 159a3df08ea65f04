//! Client configuration shared by both transports.

use std::time::Duration;

/// Remote auth API used by default.
pub const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com";

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Lifetime requested for issued tokens, in minutes.
pub const DEFAULT_TOKEN_LIFETIME_MINS: u32 = 2;

/// Settings for [`AuthClient`](super::AuthClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub api_base_url: String,
    /// Timeout applied to every request on both transports.
    pub timeout: Duration,
    /// `expiresInMins` sent on login and refresh.
    pub token_lifetime_mins: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_lifetime_mins: DEFAULT_TOKEN_LIFETIME_MINS,
        }
    }
}

impl ClientConfig {
    /// Default settings against `api_base_url`.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
