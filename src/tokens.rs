//! Typed token access on top of the cookie gateway.
//!
//! [`TokenCookies`] hides the gateway's parallel-array wire format behind
//! two operations: store an access/refresh pair, and read one or more named
//! tokens. Nothing is cached; every read goes back to the gateway because
//! cookies can change or expire out-of-band.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::gateway::{CookieGateway, GatewayError};

/// Cookie name holding the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie name holding the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// An access/refresh token pair as issued by the auth API.
///
/// Both values are bearer credentials; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived credential sent as `Authorization: Bearer`.
    pub access_token: String,
    /// Credential exchanged for a new pair.
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a token pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Result of a token read: one entry per requested name, in request order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenLookup {
    entries: Vec<(String, Option<String>)>,
}

impl TokenLookup {
    /// Value of `name`, or `None` when it was not requested or is not set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// The access token, if set.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.get(ACCESS_TOKEN_COOKIE)
    }

    /// The refresh token, if set.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.get(REFRESH_TOKEN_COOKIE)
    }

    /// Requested names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// True when no requested token is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, value)| value.is_none())
    }
}

impl fmt::Debug for TokenLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.entries {
            map.entry(name, &value.as_ref().map(|_| "[REDACTED]"));
        }
        map.finish()
    }
}

/// Token store adapter over an injected [`CookieGateway`].
#[derive(Clone)]
pub struct TokenCookies {
    gateway: Arc<dyn CookieGateway>,
}

impl fmt::Debug for TokenCookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCookies").finish_non_exhaustive()
    }
}

impl TokenCookies {
    /// Creates an adapter over `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<dyn CookieGateway>) -> Self {
        Self { gateway }
    }

    /// Stores an access/refresh pair in one gateway call.
    ///
    /// # Errors
    ///
    /// Returns the gateway error when the write does not complete.
    #[instrument(level = "debug", skip_all)]
    pub async fn store_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), GatewayError> {
        self.gateway
            .set_cookies(
                &[ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE],
                &[access_token, refresh_token],
            )
            .await?;
        debug!("Token pair stored");
        Ok(())
    }

    /// Stores `pair`.
    ///
    /// # Errors
    ///
    /// See [`store_tokens`](Self::store_tokens).
    pub async fn store_pair(&self, pair: &TokenPair) -> Result<(), GatewayError> {
        self.store_tokens(&pair.access_token, &pair.refresh_token)
            .await
    }

    /// Reads the named tokens in one gateway call.
    ///
    /// Unset cookies come back as absent entries. When the gateway reports
    /// that none of them is set, every entry is absent.
    ///
    /// # Errors
    ///
    /// Returns the gateway error for transport or validation failures.
    #[instrument(level = "debug", skip(self))]
    pub async fn read_tokens(&self, names: &[&str]) -> Result<TokenLookup, GatewayError> {
        let mut values = match self.gateway.get_cookies(names).await {
            Ok(values) => values,
            Err(GatewayError::SessionNotFound { .. }) => {
                debug!("Gateway reports no session; treating all tokens as absent");
                Default::default()
            }
            Err(error) => return Err(error),
        };

        let entries = names
            .iter()
            .map(|name| ((*name).to_string(), values.remove(*name).flatten()))
            .collect();
        Ok(TokenLookup { entries })
    }

    /// Reads both the access and the refresh token.
    ///
    /// # Errors
    ///
    /// See [`read_tokens`](Self::read_tokens).
    pub async fn read_pair(&self) -> Result<TokenLookup, GatewayError> {
        self.read_tokens(&[ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE])
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::TransportError;
    use crate::gateway::{CookieValues, MemoryCookieGateway};

    fn adapter() -> (Arc<MemoryCookieGateway>, TokenCookies) {
        let gateway = Arc::new(MemoryCookieGateway::new());
        let cookies = TokenCookies::new(gateway.clone());
        (gateway, cookies)
    }

    struct UnreachableGateway;

    #[async_trait]
    impl CookieGateway for UnreachableGateway {
        async fn set_cookies(&self, _: &[&str], _: &[&str]) -> Result<(), GatewayError> {
            Err(TransportError::timeout("http://localhost:3000/api/cookies").into())
        }

        async fn get_cookies(&self, _: &[&str]) -> Result<CookieValues, GatewayError> {
            Err(TransportError::timeout("http://localhost:3000/api/cookies").into())
        }
    }

    #[tokio::test]
    async fn test_store_tokens_writes_both_cookies_in_one_call() {
        let (gateway, cookies) = adapter();
        cookies.store_tokens("a1", "r1").await.unwrap();

        assert_eq!(gateway.set_calls(), 1);
        assert_eq!(gateway.value(ACCESS_TOKEN_COOKIE).as_deref(), Some("a1"));
        assert_eq!(gateway.value(REFRESH_TOKEN_COOKIE).as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_read_tokens_keeps_request_order_and_absent_entries() {
        let (gateway, cookies) = adapter();
        gateway.insert(REFRESH_TOKEN_COOKIE, "r1");

        let lookup = cookies
            .read_tokens(&[REFRESH_TOKEN_COOKIE, ACCESS_TOKEN_COOKIE])
            .await
            .unwrap();
        assert_eq!(
            lookup.names().collect::<Vec<_>>(),
            vec![REFRESH_TOKEN_COOKIE, ACCESS_TOKEN_COOKIE]
        );
        assert_eq!(lookup.refresh_token(), Some("r1"));
        assert_eq!(lookup.access_token(), None);
        assert!(!lookup.is_empty());
    }

    #[tokio::test]
    async fn test_read_with_no_session_is_all_absent_not_error() {
        let (_gateway, cookies) = adapter();
        let lookup = cookies.read_pair().await.unwrap();
        assert!(lookup.is_empty());
        assert_eq!(lookup.names().count(), 2);
    }

    #[tokio::test]
    async fn test_every_read_queries_the_gateway() {
        let (gateway, cookies) = adapter();
        gateway.insert(ACCESS_TOKEN_COOKIE, "a1");

        cookies.read_pair().await.unwrap();
        gateway.insert(ACCESS_TOKEN_COOKIE, "a2");
        let lookup = cookies.read_pair().await.unwrap();

        assert_eq!(gateway.get_calls(), 2);
        assert_eq!(lookup.access_token(), Some("a2"));
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let cookies = TokenCookies::new(Arc::new(UnreachableGateway));
        assert!(matches!(
            cookies.read_pair().await,
            Err(GatewayError::Transport(TransportError::Timeout { .. }))
        ));
        assert!(matches!(
            cookies.store_tokens("a1", "r1").await,
            Err(GatewayError::Transport(_))
        ));
    }

    #[test]
    fn test_token_pair_debug_is_redacted() {
        let pair = TokenPair::new("secret-access", "secret-refresh");
        let debug = format!("{pair:?}");
        assert!(!debug.contains("secret"), "tokens leaked: {debug}");
    }

    #[test]
    fn test_token_pair_deserializes_camel_case() {
        let pair: TokenPair = serde_json::from_value(serde_json::json!({
            "accessToken": "a2",
            "refreshToken": "r2",
            "id": 1
        }))
        .unwrap();
        assert_eq!(pair, TokenPair::new("a2", "r2"));
    }
}
