//! HTTP client for the same-origin `/api/cookies` endpoint.
//!
//! The endpoint answers with `Set-Cookie` headers, so the client keeps a
//! cookie jar: values written by `POST` come back on the next `GET` exactly
//! as they would in a browser session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{
    CookieGateway, CookieValues, GatewayError, INVALID_BODY_MESSAGE, SESSION_NOT_FOUND_MESSAGE,
};
use crate::error::{TransportError, extract_message};

/// Path of the cookie endpoint relative to the gateway origin.
pub const COOKIES_ENDPOINT: &str = "/api/cookies";

const GATEWAY_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetCookiesBody<'a> {
    cookie_names: &'a [&'a str],
    cookie_values: &'a [&'a str],
}

/// Cookie gateway backed by the HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpCookieGateway {
    client: Client,
    endpoint: Url,
}

impl HttpCookieGateway {
    /// Creates a gateway for the endpoint at `origin` with its own cookie jar.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] when `origin` is not a valid URL or
    /// the HTTP client cannot be built.
    pub fn new(origin: &str) -> Result<Self, GatewayError> {
        Self::with_cookie_jar(origin, Arc::new(Jar::default()))
    }

    /// Creates a gateway that shares `cookie_jar` with other clients.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] when `origin` is not a valid URL or
    /// the HTTP client cannot be built.
    pub fn with_cookie_jar(origin: &str, cookie_jar: Arc<Jar>) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(GATEWAY_TIMEOUT_SECS))
            .default_headers(headers)
            .cookie_provider(cookie_jar)
            .build()
            .map_err(|source| TransportError::from_reqwest(origin, source))?;
        Self::with_client(client, origin)
    }

    /// Wraps an already configured client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] when `origin` is not a valid URL.
    pub fn with_client(client: Client, origin: &str) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(origin)
            .and_then(|base| base.join(COOKIES_ENDPOINT))
            .map_err(|_| TransportError::invalid_url(origin))?;
        Ok(Self { client, endpoint })
    }

    /// Full URL of the cookie endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

async fn error_message(response: reqwest::Response) -> Option<String> {
    let body = response.json::<serde_json::Value>().await.ok()?;
    extract_message(&body)
}

#[async_trait]
impl CookieGateway for HttpCookieGateway {
    #[instrument(level = "debug", skip(self, values), fields(cookies = ?names))]
    async fn set_cookies(&self, names: &[&str], values: &[&str]) -> Result<(), GatewayError> {
        let url = self.endpoint.as_str();
        let body = SetCookiesBody {
            cookie_names: names,
            cookie_values: values,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| TransportError::from_reqwest(url, source))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Cookies stored");
            return Ok(());
        }

        let message = error_message(response).await;
        if status == StatusCode::BAD_REQUEST {
            return Err(GatewayError::validation(
                message.unwrap_or_else(|| INVALID_BODY_MESSAGE.to_string()),
            ));
        }
        warn!(status = status.as_u16(), "Cookie gateway rejected write");
        Err(TransportError::http_status(url, status.as_u16(), message).into())
    }

    #[instrument(level = "debug", skip(self), fields(cookies = ?names))]
    async fn get_cookies(&self, names: &[&str]) -> Result<CookieValues, GatewayError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("cookieName", &names.join(","));
        let url_str = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| TransportError::from_reqwest(&url_str, source))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let message = error_message(response)
                .await
                .unwrap_or_else(|| SESSION_NOT_FOUND_MESSAGE.to_string());
            debug!(%message, "Cookie gateway reported no session");
            return Err(GatewayError::SessionNotFound { message });
        }
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(TransportError::http_status(&url_str, status.as_u16(), message).into());
        }

        let mut found = response
            .json::<HashMap<String, Option<String>>>()
            .await
            .map_err(|error| TransportError::decode(&url_str, error.to_string()))?;

        // Unset cookies are omitted from the JSON body rather than sent as null.
        let values = names
            .iter()
            .map(|name| ((*name).to_string(), found.remove(*name).flatten()))
            .collect();
        Ok(values)
    }
}
