//! API request and response types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::{Session, SessionStatus};

/// Snapshot of a session as seen by a read-only start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshotResponse {
    /// The session id the snapshot was taken under.
    pub id: String,
    /// Session name in effect.
    pub name: String,
    /// Lifecycle status after the read.
    pub status: SessionStatus,
    /// The full variable map.
    pub vars: HashMap<String, Value>,
}

impl SessionSnapshotResponse {
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session
                .id()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: session.name().to_string(),
            status: session.status(),
            vars: session.vars().clone(),
        }
    }
}

/// Request to merge variables into a session.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateSessionRequest {
    /// Variables to set. Existing keys are overwritten; other keys are
    /// left alone.
    #[serde(default)]
    pub vars: HashMap<String, Value>,
}

/// Response for a session update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSessionResponse {
    /// The session id the update was committed under.
    pub id: String,
    /// Number of variables in the map after the merge.
    pub count: usize,
}

/// Response for a session destruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestroySessionResponse {
    /// Whether the lifecycle ran to completion.
    pub destroyed: bool,
}

/// Body of a lifecycle-chain step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowStepResponse {
    /// Step name.
    pub step: String,
    /// Whether every check in the step held.
    pub passed: bool,
}

impl FlowStepResponse {
    pub fn passed(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            passed: true,
        }
    }
}

/// Final summary of the lifecycle chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSummaryResponse {
    /// Whether the whole chain held.
    pub passed: bool,
    /// Id of the session the chain finished on.
    pub id: String,
    /// Variables left in the final record.
    pub vars: HashMap<String, Value>,
}

/// Query parameters for the post-regeneration step.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FlowQuery {
    /// Session id in effect before regeneration.
    #[serde(default)]
    pub old_id: Option<String>,
}

/// Generic API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "NO_SESSION").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn no_session() -> Self {
        Self::new("NO_SESSION", "No session cookie present")
    }

    pub fn invalid_session_id(raw: &str) -> Self {
        Self::new(
            "INVALID_SESSION_ID",
            format!("'{}' is not a valid session id", raw),
        )
    }

    pub fn check_failed(step: &str, detail: impl Into<String>) -> Self {
        Self::new(
            "CHECK_FAILED",
            format!("Lifecycle check failed at step '{}'", step),
        )
        .with_details(detail)
    }

    pub fn lifecycle_error(message: impl Into<String>) -> Self {
        Self::new("LIFECYCLE_ERROR", message)
    }
}
