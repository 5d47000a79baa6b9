//! Session record storage.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SessionError};
use crate::session::SessionId;

/// Ceiling on record lifetimes. `SystemTime` additions past roughly a
/// century of seconds can overflow on some platforms.
const MAX_LIFETIME: Duration = Duration::from_secs(100 * 365 * 86_400);

/// A stored session record: its variables plus bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Session variables. A variable may hold JSON `null`, which is
    /// distinct from the variable being absent.
    pub vars: HashMap<String, Value>,
    /// Time the record was first committed.
    pub created_at: SystemTime,
    /// Time after which the record is considered garbage.
    pub expires_at: SystemTime,
}

impl SessionData {
    /// Create an empty record valid for `lifetime` from now. Oversized
    /// lifetimes are clamped rather than overflowing the expiry.
    pub fn new(lifetime: Duration) -> Self {
        let now = SystemTime::now();
        Self {
            vars: HashMap::new(),
            created_at: now,
            expires_at: now + lifetime.min(MAX_LIFETIME),
        }
    }

    /// Check whether the record has outlived its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= SystemTime::now()
    }
}

/// Backend holding session records, keyed by session id.
///
/// Expired records behave as absent for [`load`](SessionStore::load) and
/// [`contains`](SessionStore::contains); reclaiming their space is the
/// job of [`cleanup_expired`](SessionStore::cleanup_expired).
pub trait SessionStore: Send + Sync {
    /// Load a record, or `None` if it is missing or expired.
    fn load(&self, id: &SessionId) -> Result<Option<SessionData>>;

    /// Write a record, replacing any previous one under this id.
    fn save(&self, id: &SessionId, data: SessionData) -> Result<()>;

    /// Remove a record. Returns whether one was present.
    fn delete(&self, id: &SessionId) -> Result<bool>;

    /// Check whether a live (non-expired) record exists under this id.
    fn contains(&self, id: &SessionId) -> Result<bool>;

    /// Remove all expired records, returning how many were dropped.
    fn cleanup_expired(&self) -> Result<usize>;

    /// Number of records currently held, expired ones included.
    fn count(&self) -> usize;
}

/// In-process store backed by a `HashMap`.
pub struct MemoryStore {
    records: RwLock<HashMap<SessionId, SessionData>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, id: &SessionId) -> Result<Option<SessionData>> {
        let records = self
            .records
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(records.get(id).filter(|data| !data.is_expired()).cloned())
    }

    fn save(&self, id: &SessionId, data: SessionData) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        records.insert(id.clone(), data);
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(records.remove(id).is_some())
    }

    fn contains(&self, id: &SessionId) -> Result<bool> {
        let records = self
            .records
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(records.get(id).is_some_and(|data| !data.is_expired()))
    }

    fn cleanup_expired(&self) -> Result<usize> {
        let mut records = self
            .records
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;

        let before = records.len();
        records.retain(|_, data| !data.is_expired());
        Ok(before - records.len())
    }

    fn count(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }
}
