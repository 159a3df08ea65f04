//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use cookie_auth::gateway::{CookieValues, GatewayError};
use cookie_auth::{
    AuthClient, ClientConfig, CookieGateway, MemoryCookieGateway, TokenCookies, TransportError,
};
use serde_json::{Value, json};

/// Builds a client against `api_uri` backed by a fresh in-memory cookie store.
pub fn memory_client(api_uri: &str) -> (Arc<MemoryCookieGateway>, AuthClient) {
    let gateway = Arc::new(MemoryCookieGateway::new());
    let client = client_with_gateway(api_uri, gateway.clone());
    (gateway, client)
}

/// Builds a client against `api_uri` over any gateway.
pub fn client_with_gateway(api_uri: &str, gateway: Arc<dyn CookieGateway>) -> AuthClient {
    AuthClient::new(ClientConfig::new(api_uri), TokenCookies::new(gateway))
        .expect("client should build")
}

/// A dummyjson-style user body.
pub fn user_body(id: u64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@x.dummyjson.com"),
        "firstName": "Emily",
        "lastName": "Johnson",
        "age": 28,
    })
}

/// A dummyjson-style login response carrying a token pair.
pub fn login_body(access_token: &str, refresh_token: &str) -> Value {
    let mut body = user_body(1, "emilys");
    body["accessToken"] = json!(access_token);
    body["refreshToken"] = json!(refresh_token);
    body
}

/// A refresh response carrying a token pair.
pub fn token_body(access_token: &str, refresh_token: &str) -> Value {
    json!({"accessToken": access_token, "refreshToken": refresh_token})
}

/// Gateway whose writes always fail; records every attempted write.
#[derive(Default)]
pub struct FailingWriteGateway {
    pub writes: Mutex<Vec<(Vec<String>, Vec<String>)>>,
}

#[async_trait]
impl CookieGateway for FailingWriteGateway {
    async fn set_cookies(&self, names: &[&str], values: &[&str]) -> Result<(), GatewayError> {
        self.writes.lock().unwrap().push((
            names.iter().map(ToString::to_string).collect(),
            values.iter().map(ToString::to_string).collect(),
        ));
        Err(TransportError::http_status("http://localhost:3000/api/cookies", 500, None).into())
    }

    async fn get_cookies(&self, _names: &[&str]) -> Result<CookieValues, GatewayError> {
        Err(GatewayError::session_not_found())
    }
}
