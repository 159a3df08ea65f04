//! Same-origin cookie store gateway.
//!
//! The gateway is the only place token cookies live. It exposes two
//! operations, mirroring the `/api/cookies` endpoint:
//!
//! - `POST /api/cookies` with parallel `cookieNames`/`cookieValues` arrays
//!   sets each cookie with the fixed [`CookieAttributes`].
//! - `GET /api/cookies?cookieName=a,b` returns a name → value mapping, or a
//!   400 "Session not found" when none of the names resolve.
//!
//! # Implementations
//!
//! - [`HttpCookieGateway`] - talks to the real endpoint over HTTP
//! - [`MemoryCookieGateway`] - in-process store with the same contract

mod attributes;
mod error;
mod http;
mod memory;

pub use attributes::{CookieAttributes, ENVIRONMENT_VAR, TOKEN_COOKIE_MAX_AGE};
pub use error::{GatewayError, INVALID_BODY_MESSAGE, SESSION_NOT_FOUND_MESSAGE};
pub use http::{COOKIES_ENDPOINT, HttpCookieGateway};
pub use memory::MemoryCookieGateway;

use std::collections::HashMap;

use async_trait::async_trait;

/// Cookie values keyed by name; `None` means the cookie is not set.
pub type CookieValues = HashMap<String, Option<String>>;

/// Key/value cookie store reachable through the same-origin endpoint.
#[async_trait]
pub trait CookieGateway: Send + Sync {
    /// Sets each `names[i]` to `values[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] when the arrays are empty or of
    /// different lengths, or [`GatewayError::Transport`] when the call fails.
    async fn set_cookies(&self, names: &[&str], values: &[&str]) -> Result<(), GatewayError>;

    /// Reads the named cookies.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SessionNotFound`] when no names are given or
    /// none of them is set, or [`GatewayError::Transport`] when the call fails.
    async fn get_cookies(&self, names: &[&str]) -> Result<CookieValues, GatewayError>;
}
