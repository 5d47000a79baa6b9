//! Session cookie parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters used when the session id is carried in a cookie.
///
/// The facade only records these values; writing the actual `Set-Cookie`
/// header is up to the embedding layer. A `lifetime_secs` of zero means
/// the cookie lasts until the client closes, which is also the reason
/// [`CookieParams::max_age`] returns `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieParams {
    /// Cookie lifetime in seconds. Zero means a browser-session cookie.
    pub lifetime_secs: u64,
    /// Path the cookie is scoped to.
    pub path: String,
    /// Domain the cookie is scoped to, if any.
    pub domain: Option<String>,
    /// Only send the cookie over secure transports.
    pub secure: bool,
    /// Hide the cookie from client-side scripts.
    pub http_only: bool,
}

impl Default for CookieParams {
    fn default() -> Self {
        Self {
            lifetime_secs: 0,
            path: "/".to_string(),
            domain: None,
            secure: false,
            http_only: true,
        }
    }
}

impl CookieParams {
    /// Cookie max age, or `None` for a browser-session cookie.
    pub fn max_age(&self) -> Option<Duration> {
        if self.lifetime_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.lifetime_secs))
        }
    }
}
