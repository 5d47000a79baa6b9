//! Session status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a session for the current request.
///
/// Three states cover the lifecycle: sessions switched off entirely,
/// sessions available but none started, and a started session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Sessions are disabled; start always fails.
    Disabled,
    /// Sessions are enabled but none is active.
    #[default]
    None,
    /// A session is active for this request.
    Active,
}

impl SessionStatus {
    /// Check whether a session is currently active.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Disabled => "disabled",
            SessionStatus::None => "none",
            SessionStatus::Active => "active",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        assert_eq!(SessionStatus::default(), SessionStatus::None);
    }

    #[test]
    fn test_is_active() {
        assert!(!SessionStatus::Disabled.is_active());
        assert!(!SessionStatus::None.is_active());
        assert!(SessionStatus::Active.is_active());
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionStatus::Disabled.to_string(), "disabled");
        assert_eq!(SessionStatus::None.to_string(), "none");
        assert_eq!(SessionStatus::Active.to_string(), "active");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Active).unwrap(),
            "\"active\""
        );
        let status: SessionStatus = serde_json::from_str("\"disabled\"").unwrap();
        assert_eq!(status, SessionStatus::Disabled);
    }
}
