//! Session identifier type and id generation.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::Result;

/// Maximum accepted length of a session id, prefix included.
const MAX_ID_LEN: usize = 128;

/// Maximum accepted length of an id prefix.
const MAX_PREFIX_LEN: usize = 64;

/// Opaque identifier for a session.
///
/// Ids are plain strings restricted to `[A-Za-z0-9,-]` so they survive
/// cookie headers and query strings unescaped. The facade never invents
/// ids itself; they come from an [`IdGenerator`] or from the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Parse and validate a session id.
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() || s.len() > MAX_ID_LEN || !s.chars().all(is_id_char) {
            return Err(SessionError::InvalidId(s));
        }
        Ok(Self(s))
    }

    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ',' || c == '-'
}

/// Validate an id prefix for [`IdGenerator::generate`].
///
/// Prefixes follow the same character rules as ids; an empty prefix is
/// allowed and equivalent to no prefix.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.len() > MAX_PREFIX_LEN || !prefix.chars().all(is_id_char) {
        return Err(SessionError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Source of new session ids.
///
/// Generation is injected into the facade so tests can run with a
/// deterministic sequence instead of ambient randomness. Callers are
/// expected to run `prefix` through [`validate_prefix`] first; the
/// facade's `create_id` does so.
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh id, prepending `prefix` when given.
    fn generate(&self, prefix: Option<&str>) -> SessionId;
}

/// Collision-resistant generator backed by UUIDv4.
///
/// Produces 32 hexadecimal characters of random material per id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self, prefix: Option<&str>) -> SessionId {
        let hex = Uuid::new_v4().simple().to_string();
        match prefix {
            Some(p) if !p.is_empty() => SessionId(format!("{}{}", p, hex)),
            _ => SessionId(hex),
        }
    }
}

/// Deterministic generator for tests.
///
/// Hands out ids from an instance-owned counter, so two generators
/// seeded alike produce the same sequence.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator counting from 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator counting from `seed`.
    pub fn starting_at(seed: u64) -> Self {
        Self {
            counter: AtomicU64::new(seed),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self, prefix: Option<&str>) -> SessionId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        match prefix {
            Some(p) if !p.is_empty() => SessionId(format!("{}{:016x}", p, n)),
            _ => SessionId(format!("{:016x}", n)),
        }
    }
}
