//! Session lifecycle module.
//!
//! This module provides the per-request session facade plus the pieces
//! it is assembled from: id generation, the storage seam, status and
//! cookie/option types.

mod cookie;
mod facade;
mod id;
mod options;
mod status;
mod store;

pub use cookie::CookieParams;
pub use facade::Session;
pub use id::{
    validate_prefix, IdGenerator, RandomIdGenerator, SequentialIdGenerator, SessionId,
};
pub use options::{
    validate_name, SessionOptions, StartOptions, DEFAULT_MAX_LIFETIME_SECS, DEFAULT_SESSION_NAME,
};
pub use status::SessionStatus;
pub use store::{MemoryStore, SessionData, SessionStore};
