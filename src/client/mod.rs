//! Authenticated API client with token interception.
//!
//! [`AuthClient`] owns two transports with identical configuration:
//!
//! - the **intercepted** transport, used by [`AuthClient::execute`], runs the
//!   request stage (attach bearer token, refreshing first if only a refresh
//!   token is left) and the response stage (persist tokens after login,
//!   refresh and retry once after a 401);
//! - the **raw** transport, used for the refresh call and the single retried
//!   request, so refresh and retry can never re-enter interception.
//!
//! Tokens live only in the injected cookie store, reached through
//! [`TokenCookies`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cookie_auth::client::{AuthClient, ClientConfig};
//! use cookie_auth::gateway::HttpCookieGateway;
//! use cookie_auth::tokens::TokenCookies;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpCookieGateway::new("http://localhost:3000")?;
//! let client = AuthClient::new(ClientConfig::default(), TokenCookies::new(Arc::new(gateway)))?;
//!
//! let login = client.login("emilys", "emilyspass").await;
//! let me = client.current_user().await;
//! println!("{:?} {:?}", login.error(), me.data());
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Refreshes are not deduplicated. Two calls that hit a 401 at the same time
//! each refresh independently and the last pair written to the cookie store
//! wins.

mod config;
mod error;
mod request;
mod transport;
mod user;

pub use config::{
    ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_LIFETIME_MINS,
};
pub use error::{AuthError, UNEXPECTED_ERROR_MESSAGE};
pub use request::{ApiRequest, ApiResponse, ApiResult, AuthRequirement};
pub use user::User;

use rand::Rng;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::error::TransportError;
use crate::tokens::{REFRESH_TOKEN_COOKIE, TokenCookies, TokenPair};
use transport::Transport;

/// Login endpoint.
pub const LOGIN_PATH: &str = "/auth/login";

/// Token refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Protected endpoint returning the signed-in user.
pub const CURRENT_USER_PATH: &str = "/auth/me";

/// Public user listing.
pub const USERS_PATH: &str = "/users";

/// Upper bound (inclusive) for [`AuthClient::random_dummy_user`] ids.
pub const DUMMY_USER_ID_RANGE: u32 = 200;

/// HTTP 401 Unauthorized.
const UNAUTHORIZED: u16 = 401;

/// API client that keeps its tokens in the cookie store.
#[derive(Debug, Clone)]
pub struct AuthClient {
    config: ClientConfig,
    intercepted: Transport,
    raw: Transport,
    tokens: TokenCookies,
}

impl AuthClient {
    /// Creates a client; both transports share `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] when the base URL is invalid or an
    /// HTTP client cannot be built.
    pub fn new(config: ClientConfig, tokens: TokenCookies) -> Result<Self, AuthError> {
        let intercepted = Transport::new(&config, "intercepted")?;
        let raw = Transport::new(&config, "raw")?;
        Ok(Self {
            config,
            intercepted,
            raw,
            tokens,
        })
    }

    /// Client settings.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `request` through the intercepted transport.
    ///
    /// # Errors
    ///
    /// - [`AuthError::SessionExpired`] when a protected call has no usable token
    /// - [`AuthError::Transport`] for network failures, timeouts, non-2xx
    ///   answers, and failed refreshes (which supersede the original 401)
    /// - [`AuthError::Validation`] when a token cannot be sent as a header
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path, auth = ?request.auth))]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, AuthError> {
        let request = self.intercept_request(request).await?;
        let outcome = self.intercepted.send(&request).await;
        self.intercept_response(request, outcome).await
    }

    /// Exchanges `refresh_token` for a new token pair over the raw transport.
    ///
    /// The new pair is returned, not stored; callers persist it.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the call fails or the answer carries
    /// no token pair.
    #[instrument(level = "debug", skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TransportError> {
        let request = ApiRequest::post(REFRESH_PATH)
            .with_auth(AuthRequirement::Refresh)
            .with_json(serde_json::json!({
                "refreshToken": refresh_token,
                "expiresInMins": self.config.token_lifetime_mins,
            }));

        let response = self.raw.send(&request).await?;
        let pair = serde_json::from_value::<TokenPair>(response.body).map_err(|error| {
            TransportError::decode(REFRESH_PATH, format!("missing token pair: {error}"))
        })?;
        debug!("Access token refreshed");
        Ok(pair)
    }

    /// Request stage: attaches a bearer token to protected requests.
    async fn intercept_request(&self, mut request: ApiRequest) -> Result<ApiRequest, AuthError> {
        if request.auth != AuthRequirement::Bearer {
            return Ok(request);
        }

        let lookup = self.tokens.read_pair().await?;
        let access_token = match (lookup.access_token(), lookup.refresh_token()) {
            (Some(access_token), _) => access_token.to_string(),
            (None, Some(refresh_token)) => {
                debug!("Access token missing; refreshing before request");
                let pair = self.refresh(refresh_token).await?;
                self.tokens.store_pair(&pair).await?;
                pair.access_token
            }
            (None, None) => {
                debug!("No tokens available for protected request");
                return Err(AuthError::SessionExpired);
            }
        };

        request.set_bearer(&access_token)?;
        Ok(request)
    }

    /// Response stage: persists login tokens and retries once after a 401.
    async fn intercept_response(
        &self,
        request: ApiRequest,
        outcome: Result<ApiResponse, TransportError>,
    ) -> Result<ApiResponse, AuthError> {
        match outcome {
            Ok(response) => {
                if request.auth == AuthRequirement::Login {
                    self.persist_login_tokens(&response.body).await;
                }
                Ok(response)
            }
            Err(error) if error.status() == Some(UNAUTHORIZED) && !request.retried() => {
                debug!(%error, "Unauthorized; refreshing and retrying once");
                self.refresh_and_retry(request).await
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn refresh_and_retry(&self, mut request: ApiRequest) -> Result<ApiResponse, AuthError> {
        let lookup = self.tokens.read_tokens(&[REFRESH_TOKEN_COOKIE]).await?;
        let Some(refresh_token) = lookup.refresh_token() else {
            debug!("No refresh token; session expired");
            return Err(AuthError::SessionExpired);
        };

        let pair = self.refresh(refresh_token).await?;
        self.tokens.store_pair(&pair).await?;

        request.set_bearer(&pair.access_token)?;
        request.mark_retried();
        info!(path = %request.path, "Retrying request with refreshed token");
        Ok(self.raw.send(&request).await?)
    }

    /// Stores the token pair from a login response. Failures are logged only.
    async fn persist_login_tokens(&self, body: &serde_json::Value) {
        let pair = match serde_json::from_value::<TokenPair>(body.clone()) {
            Ok(pair) => pair,
            Err(error) => {
                warn!(%error, "Login response carried no token pair; nothing persisted");
                return;
            }
        };

        match self.tokens.store_pair(&pair).await {
            Ok(()) => debug!("Login tokens persisted"),
            Err(error) => warn!(%error, "Failed to persist login tokens; login still succeeds"),
        }
    }

    /// Executes `request` and folds every outcome into an [`ApiResult`].
    ///
    /// Never fails: errors become the `Error` arm with a user-facing message.
    pub async fn call_api<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        match self.execute(request).await {
            Ok(response) => match serde_json::from_value::<T>(response.body) {
                Ok(data) => ApiResult::Success { data },
                Err(error) => {
                    let error = AuthError::unexpected(error.to_string());
                    warn!(%error, "Response did not match the expected shape");
                    ApiResult::from_error(&error)
                }
            },
            Err(error) => {
                warn!(%error, "API call failed");
                ApiResult::from_error(&error)
            }
        }
    }

    /// Convenience wrapper for public calls: `path`, `method`, optional JSON
    /// body and query parameters.
    pub async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        data: Option<serde_json::Value>,
        params: &[(&str, &str)],
    ) -> ApiResult<T> {
        let mut request = ApiRequest::new(method, path);
        request.body = data;
        for (key, value) in params {
            request = request.with_query(*key, *value);
        }
        self.call_api(request).await
    }

    /// Logs in; on success the returned tokens are stored as cookies.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        let request = ApiRequest::post(LOGIN_PATH)
            .with_auth(AuthRequirement::Login)
            .with_json(serde_json::json!({
                "username": username,
                "password": password,
                "expiresInMins": self.config.token_lifetime_mins,
            }));
        self.call_api(request).await
    }

    /// Fetches the signed-in user.
    pub async fn current_user(&self) -> ApiResult<User> {
        let request = ApiRequest::get(CURRENT_USER_PATH).with_auth(AuthRequirement::Bearer);
        self.call_api(request).await
    }

    /// Fetches a user from the public listing.
    pub async fn user_by_id(&self, id: u32) -> ApiResult<User> {
        self.call_api(ApiRequest::get(format!("{USERS_PATH}/{id}")))
            .await
    }

    /// Fetches a random demo user whose credentials can be used to log in.
    pub async fn random_dummy_user(&self) -> ApiResult<User> {
        let id = rand::thread_rng().gen_range(0..=DUMMY_USER_ID_RANGE);
        debug!(id, "Picked demo user");
        self.user_by_id(id).await
    }
}
