//! Error types for session-bridge.

use thiserror::Error;

/// Main error type for session-bridge operations.
///
/// Typed errors only appear at the seams (store access, id parsing,
/// name/prefix validation). The lifecycle operations on the facade
/// report plain success/failure and log the underlying error instead
/// of returning it.
#[derive(Error, Debug)]
pub enum SessionError {
    /// String is not a well-formed session id.
    #[error("invalid session id: {0:?}")]
    InvalidId(String),

    /// String is not usable as a session name.
    #[error("invalid session name: {0:?}")]
    InvalidName(String),

    /// String is not usable as an id prefix.
    #[error("invalid id prefix: {0:?}")]
    InvalidPrefix(String),

    /// Internal store lock was poisoned.
    #[error("session store lock poisoned")]
    LockPoisoned,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for session-bridge operations.
pub type Result<T> = std::result::Result<T, SessionError>;
