//! A configured HTTP transport that sends [`ApiRequest`]s as-is.
//!
//! The client owns two of these with identical configuration. Interception
//! lives in the client, not here, so a transport never re-enters the
//! refresh logic.

use reqwest::Client;
use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, instrument};
use url::Url;

use super::{ApiRequest, ApiResponse, ClientConfig};
use crate::error::{TransportError, extract_message};

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: Client,
    base_url: String,
    name: &'static str,
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig, name: &'static str) -> Result<Self, TransportError> {
        Url::parse(&config.api_base_url)
            .map_err(|_| TransportError::invalid_url(&config.api_base_url))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| TransportError::from_reqwest(&config.api_base_url, source))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            name,
        })
    }

    /// Builds the absolute URL for a request, appending query parameters.
    ///
    /// Paths are appended to the base URL (keeping any base path prefix);
    /// absolute URLs are used unchanged.
    pub(crate) fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let raw = if request.path.starts_with("http://") || request.path.starts_with("https://") {
            request.path.clone()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                request.path.trim_start_matches('/')
            )
        };
        let mut url = Url::parse(&raw).map_err(|_| TransportError::invalid_url(&raw))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    /// Sends `request` and returns its 2xx response.
    ///
    /// # Errors
    ///
    /// Non-2xx responses become [`TransportError::HttpStatus`] carrying the
    /// body's `message` field.
    #[instrument(level = "debug", skip(self, request), fields(transport = self.name, method = %request.method, path = %request.path))]
    pub(crate) async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(request)?;
        let url_str = url.to_string();

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| TransportError::from_reqwest(&url_str, source))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TransportError::from_reqwest(&url_str, source))?;
        let body = parse_body(&bytes);

        debug!(status = status.as_u16(), "Response received");
        if !status.is_success() {
            return Err(TransportError::http_status(
                url_str,
                status.as_u16(),
                extract_message(&body),
            ));
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn parse_body(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
