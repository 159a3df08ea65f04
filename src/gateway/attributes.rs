//! Fixed attribute set for token cookies and its `Set-Cookie` rendering.

use std::time::Duration;

/// Lifetime of every token cookie, matching the backend's two-minute tokens.
pub const TOKEN_COOKIE_MAX_AGE: Duration = Duration::from_secs(120);

/// Environment variable that switches cookies to `Secure` when set to `production`.
pub const ENVIRONMENT_VAR: &str = "COOKIE_AUTH_ENV";

/// Attributes applied to every token cookie.
///
/// Only the name and value differ between cookies written by the gateway;
/// this struct is the single source for everything else. `SameSite` is
/// always `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    /// Hide the cookie from scripts.
    pub http_only: bool,
    /// Only send over HTTPS.
    pub secure: bool,
    /// URL path scope.
    pub path: String,
    /// Time until the cookie expires.
    pub max_age: Duration,
    /// Opt into partitioned (CHIPS) storage.
    pub partitioned: bool,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self::for_environment(false)
    }
}

impl CookieAttributes {
    /// Token cookie attributes; `Secure` only in production.
    #[must_use]
    pub fn for_environment(production: bool) -> Self {
        Self {
            http_only: true,
            secure: production,
            path: "/".to_string(),
            max_age: TOKEN_COOKIE_MAX_AGE,
            partitioned: true,
        }
    }

    /// Reads [`ENVIRONMENT_VAR`] to decide whether cookies are `Secure`.
    #[must_use]
    pub fn from_env() -> Self {
        let production = std::env::var(ENVIRONMENT_VAR)
            .is_ok_and(|value| value.trim().eq_ignore_ascii_case("production"));
        Self::for_environment(production)
    }

    /// Returns a copy with a different max age.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Renders a `Set-Cookie` header value for `name=value`.
    ///
    /// The value is percent-encoded so token characters cannot break the
    /// attribute list.
    #[must_use]
    pub fn render(&self, name: &str, value: &str) -> String {
        let mut header = format!("{name}={}", urlencoding::encode(value));
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header.push_str(&format!(
            "; SameSite=None; Path={}; Max-Age={}",
            self.path,
            self.max_age.as_secs()
        ));
        if self.partitioned {
            header.push_str("; Partitioned");
        }
        header
    }
}
