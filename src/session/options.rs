//! Session configuration and per-start options.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::session::cookie::CookieParams;

/// Default session name, used for the cookie carrying the id.
pub const DEFAULT_SESSION_NAME: &str = "SBSESSID";

/// Default record lifetime in seconds before garbage collection.
pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 1440;

/// Maximum accepted session name length.
const MAX_NAME_LEN: usize = 64;

/// Validate a session name.
///
/// Names must be non-empty alphanumeric strings with at least one
/// letter. A digits-only name would be indistinguishable from a numeric
/// cookie value on some clients, so it is rejected.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(SessionError::InvalidName(name.to_string()));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SessionError::InvalidName(name.to_string()));
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Err(SessionError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Standing configuration for a session facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Session name, also the cookie name when ids travel by cookie.
    pub name: String,
    /// Cookie parameters reported alongside the name.
    pub cookie: CookieParams,
    /// Seconds a stored record stays valid after its last commit.
    pub max_lifetime_secs: u64,
    /// Whether sessions are enabled at all.
    pub enabled: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_NAME.to_string(),
            cookie: CookieParams::default(),
            max_lifetime_secs: DEFAULT_MAX_LIFETIME_SECS,
            enabled: true,
        }
    }
}

/// Per-call overrides applied when starting a session.
///
/// Recognized overrides fold into the standing options and stick on
/// the facade for the rest of its lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Replace the session name before starting. Ignored when invalid.
    pub name: Option<String>,
    /// Replace all cookie parameters before starting.
    pub cookie: Option<CookieParams>,
    /// Override the configured record lifetime.
    pub max_lifetime_secs: Option<u64>,
    /// Load the record, then end the active phase immediately without
    /// writing anything back.
    pub read_and_close: bool,
}

impl StartOptions {
    /// Options for a read-only start.
    pub fn read_only() -> Self {
        Self {
            read_and_close: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = SessionOptions::default();
        assert_eq!(opts.name, "SBSESSID");
        assert_eq!(opts.max_lifetime_secs, 1440);
        assert!(opts.enabled);
        assert_eq!(opts.cookie, CookieParams::default());
    }

    #[test]
    fn test_validate_name_accepts_alphanumeric() {
        assert!(validate_name("SBSESSID").is_ok());
        assert!(validate_name("sid2").is_ok());
        assert!(validate_name("A").is_ok());
    }

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(matches!(
            validate_name(""),
            Err(SessionError::InvalidName(_))
        ));
    }

    #[test]
    fn test_validate_name_rejects_too_long() {
        let name = "a".repeat(MAX_NAME_LEN + 1);
        assert!(validate_name(&name).is_err());
    }

    #[test]
    fn test_validate_name_rejects_symbols() {
        assert!(validate_name("my session").is_err());
        assert!(validate_name("sid;evil").is_err());
        assert!(validate_name("sid-2").is_err());
    }

    #[test]
    fn test_validate_name_rejects_digits_only() {
        assert!(validate_name("12345").is_err());
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let opts: SessionOptions = serde_json::from_str(r#"{"name": "APPSID"}"#).unwrap();
        assert_eq!(opts.name, "APPSID");
        assert_eq!(opts.max_lifetime_secs, DEFAULT_MAX_LIFETIME_SECS);
        assert!(opts.enabled);
    }

    #[test]
    fn test_read_only_start_options() {
        let opts = StartOptions::read_only();
        assert!(opts.read_and_close);
        assert_eq!(opts.name, None);
        assert_eq!(opts.cookie, None);
        assert_eq!(opts.max_lifetime_secs, None);
    }
}
