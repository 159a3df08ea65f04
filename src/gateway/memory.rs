//! In-process cookie gateway with the same contract as the HTTP endpoint.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{CookieAttributes, CookieGateway, CookieValues, GatewayError, INVALID_BODY_MESSAGE};

#[derive(Debug)]
struct StoredCookie {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct MemoryState {
    cookies: HashMap<String, StoredCookie>,
    set_cookie_headers: Vec<String>,
    get_calls: usize,
    set_calls: usize,
}

/// Cookie store held in process memory.
///
/// Applies the endpoint's rules: parallel arrays are validated on set,
/// cookies expire after the attribute max age, and a lookup where nothing
/// resolves is reported as [`GatewayError::SessionNotFound`].
///
/// Every rendered `Set-Cookie` header and every call is recorded so tests
/// can observe exactly what the adapter did.
#[derive(Debug)]
pub struct MemoryCookieGateway {
    attributes: CookieAttributes,
    state: Mutex<MemoryState>,
}

impl Default for MemoryCookieGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCookieGateway {
    /// Creates an empty store with development cookie attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_attributes(CookieAttributes::default())
    }

    /// Creates an empty store with the given cookie attributes.
    #[must_use]
    pub fn with_attributes(attributes: CookieAttributes) -> Self {
        Self {
            attributes,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Attributes applied to every cookie this store sets.
    #[must_use]
    pub fn attributes(&self) -> &CookieAttributes {
        &self.attributes
    }

    /// Seeds a cookie without counting it as a gateway call.
    pub fn insert(&self, name: &str, value: &str) {
        let expires_at = Instant::now() + self.attributes.max_age;
        self.lock().cookies.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at,
            },
        );
    }

    /// Current value of a cookie, ignoring expired entries.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<String> {
        let mut state = self.lock();
        live_value(&mut state, name)
    }

    /// Drops every cookie, as if the browser cleared them.
    pub fn clear(&self) {
        self.lock().cookies.clear();
    }

    /// All `Set-Cookie` headers rendered so far, oldest first.
    #[must_use]
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.lock().set_cookie_headers.clone()
    }

    /// Number of `get_cookies` calls served.
    #[must_use]
    pub fn get_calls(&self) -> usize {
        self.lock().get_calls
    }

    /// Number of `set_cookies` calls served.
    #[must_use]
    pub fn set_calls(&self) -> usize {
        self.lock().set_calls
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn live_value(state: &mut MemoryState, name: &str) -> Option<String> {
    let expired = state
        .cookies
        .get(name)
        .is_some_and(|cookie| Instant::now() >= cookie.expires_at);
    if expired {
        state.cookies.remove(name);
        return None;
    }
    state.cookies.get(name).map(|cookie| cookie.value.clone())
}

#[async_trait]
impl CookieGateway for MemoryCookieGateway {
    #[instrument(level = "debug", skip(self, values), fields(cookies = ?names))]
    async fn set_cookies(&self, names: &[&str], values: &[&str]) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.set_calls += 1;

        if names.is_empty() || names.len() != values.len() {
            return Err(GatewayError::validation(INVALID_BODY_MESSAGE));
        }

        let expires_at = Instant::now() + self.attributes.max_age;
        for (name, value) in names.iter().zip(values) {
            let header = self.attributes.render(name, value);
            state.set_cookie_headers.push(header);
            state.cookies.insert(
                (*name).to_string(),
                StoredCookie {
                    value: (*value).to_string(),
                    expires_at,
                },
            );
        }
        debug!(count = names.len(), "Cookies set");
        Ok(())
    }

    #[instrument(level = "debug", skip(self), fields(cookies = ?names))]
    async fn get_cookies(&self, names: &[&str]) -> Result<CookieValues, GatewayError> {
        let mut state = self.lock();
        state.get_calls += 1;

        if names.is_empty() {
            return Err(GatewayError::session_not_found());
        }

        let values: CookieValues = names
            .iter()
            .map(|name| ((*name).to_string(), live_value(&mut state, name)))
            .collect();

        if values.values().all(Option::is_none) {
            debug!("No requested cookie is set");
            return Err(GatewayError::session_not_found());
        }
        Ok(values)
    }
}
