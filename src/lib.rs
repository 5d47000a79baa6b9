//! # session-bridge
//!
//! Object-oriented facade over web-session lifecycle primitives.
//!
//! The [`Session`] facade owns one request's worth of session state:
//! the variable map, the id, the name, cookie parameters and lifecycle
//! status. Persistence between requests goes through the
//! [`SessionStore`] seam (with [`MemoryStore`] as the bundled
//! in-process backend), and id generation through the injectable
//! [`IdGenerator`] trait. An axum HTTP surface in [`api`] drives the
//! whole lifecycle end-to-end across redirects, cookie in hand.
//!
//! ## Features
//!
//! - **Full lifecycle**: start, commit, abort, destroy, reset, unset,
//!   id regeneration, collision-checked id creation, garbage collection
//! - **Explicit state**: no process-wide globals; one facade per request
//! - **Null-aware variables**: a stored JSON null is distinct from an
//!   absent key
//! - **Pluggable seams**: storage and id generation behind traits
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use session_bridge::{MemoryStore, Session};
//!
//! let store = Arc::new(MemoryStore::new());
//!
//! let mut session = Session::with_defaults(store.clone());
//! assert!(session.start());
//! session.set("user", "alice");
//! let id = session.id().cloned();
//! assert!(session.commit());
//!
//! // A later request picks the value back up under the same id.
//! let mut next = Session::with_defaults(store);
//! next.set_id(id.expect("started sessions always carry an id"));
//! assert!(next.start());
//! assert_eq!(next.get("user").and_then(|v| v.as_str()), Some("alice"));
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use error::{Result, SessionError};
pub use session::{
    CookieParams, IdGenerator, MemoryStore, RandomIdGenerator, SequentialIdGenerator, Session,
    SessionData, SessionId, SessionOptions, SessionStatus, SessionStore, StartOptions,
};
