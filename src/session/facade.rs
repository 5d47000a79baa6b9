//! The session facade.
//!
//! One instance serves one request. It owns the in-memory variable map
//! plus the id, name, cookie-parameter and status bookkeeping, and
//! delegates persistence to a [`SessionStore`]. Lifecycle operations
//! report success as a plain bool; failures at the store or validation
//! seams are logged and folded into `false`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde_json::Value;
use tracing::{debug, warn};

use crate::session::cookie::CookieParams;
use crate::session::id::{validate_prefix, IdGenerator, RandomIdGenerator, SessionId};
use crate::session::options::{validate_name, SessionOptions, StartOptions};
use crate::session::status::SessionStatus;
use crate::session::store::{SessionData, SessionStore};

/// Attempts to find an unused id before giving up.
const MAX_CREATE_ATTEMPTS: usize = 8;

/// Per-request session object.
pub struct Session {
    store: Arc<dyn SessionStore>,
    ids: Arc<dyn IdGenerator>,
    options: SessionOptions,
    status: SessionStatus,
    id: Option<SessionId>,
    vars: HashMap<String, Value>,
    created_at: Option<SystemTime>,
}

impl Session {
    /// Create a facade over `store` with the given id generator and options.
    pub fn new(
        store: Arc<dyn SessionStore>,
        ids: Arc<dyn IdGenerator>,
        options: SessionOptions,
    ) -> Self {
        let status = if options.enabled {
            SessionStatus::None
        } else {
            SessionStatus::Disabled
        };

        Self {
            store,
            ids,
            options,
            status,
            id: None,
            vars: HashMap::new(),
            created_at: None,
        }
    }

    /// Create a facade with random ids and default options.
    pub fn with_defaults(store: Arc<dyn SessionStore>) -> Self {
        Self::new(store, Arc::new(RandomIdGenerator::new()), SessionOptions::default())
    }

    /// Start the session with no per-call overrides.
    pub fn start(&mut self) -> bool {
        self.start_with(StartOptions::default())
    }

    /// Start the session.
    ///
    /// Loads the record for the current id, generating a fresh id when
    /// none is set. An unknown or expired id starts an empty mapping
    /// under that id. Returns false when sessions are disabled or the
    /// store load fails; starting an already-active session logs and
    /// returns true without reloading.
    pub fn start_with(&mut self, opts: StartOptions) -> bool {
        if self.status == SessionStatus::Disabled {
            warn!("Sessions are disabled; start refused");
            return false;
        }
        if self.status.is_active() {
            warn!("Session already active; start ignored");
            return true;
        }

        // Recognized overrides fold into the standing options.
        if let Some(name) = opts.name {
            match validate_name(&name) {
                Ok(()) => self.options.name = name,
                Err(err) => warn!("Ignoring session name override: {}", err),
            }
        }
        if let Some(cookie) = opts.cookie {
            self.options.cookie = cookie;
        }
        if let Some(secs) = opts.max_lifetime_secs {
            self.options.max_lifetime_secs = secs;
        }

        let id = match self.id.clone() {
            Some(id) => id,
            None => self.ids.generate(None),
        };

        match self.store.load(&id) {
            Ok(Some(data)) => {
                debug!("Started session {} with {} variable(s)", id, data.vars.len());
                self.vars = data.vars;
                self.created_at = Some(data.created_at);
            }
            Ok(None) => {
                debug!("Started fresh session {}", id);
                self.vars = HashMap::new();
                self.created_at = Some(SystemTime::now());
            }
            Err(err) => {
                warn!("Failed to load session {}: {}", id, err);
                return false;
            }
        }

        self.id = Some(id);
        self.status = if opts.read_and_close {
            SessionStatus::None
        } else {
            SessionStatus::Active
        };
        true
    }

    /// Persist the variable map and end the active phase.
    ///
    /// The stored record keeps its original creation time and gets a
    /// fresh expiry. A store failure still ends the active phase.
    pub fn commit(&mut self) -> bool {
        if !self.status.is_active() {
            warn!("Commit without an active session");
            return false;
        }
        self.status = SessionStatus::None;

        if let Some(id) = &self.id {
            let mut data = SessionData::new(self.lifetime());
            data.vars = self.vars.clone();
            if let Some(created) = self.created_at {
                data.created_at = created;
            }

            match self.store.save(id, data) {
                Ok(()) => debug!("Committed session {}", id),
                Err(err) => {
                    warn!("Failed to persist session {}: {}", id, err);
                    return false;
                }
            }
        }
        true
    }

    /// End the active phase without persisting anything.
    ///
    /// The backing record keeps its prior values. The in-memory map is
    /// left as-is until the next start replaces it.
    pub fn abort(&mut self) -> bool {
        if !self.status.is_active() {
            warn!("Abort without an active session");
            return false;
        }
        self.status = SessionStatus::None;
        debug!("Aborted session without persisting");
        true
    }

    /// Delete the backing record and end the active phase.
    ///
    /// The in-memory map and the current id are left in place; the next
    /// start establishes a fresh mapping.
    pub fn destroy(&mut self) -> bool {
        if !self.status.is_active() {
            warn!("Destroy without an active session");
            return false;
        }
        self.status = SessionStatus::None;

        if let Some(id) = &self.id {
            match self.store.delete(id) {
                Ok(existed) => debug!("Destroyed session {} (record existed: {})", id, existed),
                Err(err) => {
                    warn!("Failed to destroy session {}: {}", id, err);
                    return false;
                }
            }
        }
        true
    }

    /// Reload the variable map from the store, discarding in-memory
    /// changes. The session stays active.
    pub fn reset(&mut self) -> bool {
        if !self.status.is_active() {
            warn!("Reset without an active session");
            return false;
        }

        if let Some(id) = &self.id {
            match self.store.load(id) {
                Ok(Some(data)) => {
                    self.vars = data.vars;
                    self.created_at = Some(data.created_at);
                }
                Ok(None) => {
                    self.vars.clear();
                    self.created_at = Some(SystemTime::now());
                }
                Err(err) => {
                    warn!("Failed to reload session {}: {}", id, err);
                    return false;
                }
            }
        }
        true
    }

    /// Clear the in-memory variable map. The store is untouched until
    /// the next commit.
    pub fn unset(&mut self) -> bool {
        self.vars.clear();
        true
    }

    /// Swap the current id for a fresh collision-checked one, keeping
    /// the variable map and staying active.
    ///
    /// With `delete_old` the old record is erased; otherwise it stays
    /// readable under the old id until garbage collection claims it.
    pub fn regenerate_id(&mut self, delete_old: bool) -> bool {
        if !self.status.is_active() {
            warn!("Cannot regenerate the id without an active session");
            return false;
        }

        let Some(fresh) = self.collision_free_id(None) else {
            return false;
        };

        if delete_old {
            if let Some(old) = &self.id {
                match self.store.delete(old) {
                    Ok(_) => debug!("Deleted superseded session record {}", old),
                    Err(err) => {
                        warn!("Failed to delete superseded session {}: {}", old, err);
                        return false;
                    }
                }
            }
        }

        self.id = Some(fresh);
        true
    }

    /// Produce a new id without touching the session state.
    ///
    /// Returns `None` when the prefix is invalid or, while a session is
    /// active, when no collision-free id could be found.
    pub fn create_id(&self, prefix: Option<&str>) -> Option<SessionId> {
        if let Some(prefix) = prefix {
            if let Err(err) = validate_prefix(prefix) {
                warn!("Rejected session id prefix: {}", err);
                return None;
            }
        }
        self.collision_free_id(prefix)
    }

    /// Remove expired records from the store. Works with or without an
    /// active session; intended to run out-of-band.
    pub fn gc(&self) -> bool {
        match self.store.cleanup_expired() {
            Ok(removed) => {
                debug!("Garbage collected {} expired session(s)", removed);
                true
            }
            Err(err) => {
                warn!("Session garbage collection failed: {}", err);
                false
            }
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Current session id, if one has been set or started.
    pub fn id(&self) -> Option<&SessionId> {
        self.id.as_ref()
    }

    /// Install the id the next start will load, returning the previous
    /// one. While a session is active the id is immutable; the call
    /// logs and returns `None`.
    pub fn set_id(&mut self, id: SessionId) -> Option<SessionId> {
        if self.status.is_active() {
            warn!("Cannot change the id of an active session");
            return None;
        }
        self.id.replace(id)
    }

    /// Current session name.
    pub fn name(&self) -> &str {
        &self.options.name
    }

    /// Change the session name, returning the name previously in
    /// effect. Invalid names and calls while active leave it unchanged.
    pub fn set_name(&mut self, name: &str) -> String {
        let previous = self.options.name.clone();
        if self.status.is_active() {
            warn!("Cannot rename an active session");
            return previous;
        }
        match validate_name(name) {
            Ok(()) => self.options.name = name.to_string(),
            Err(err) => warn!("Rejected session name: {}", err),
        }
        previous
    }

    /// Cookie parameters currently in effect.
    pub fn cookie_params(&self) -> &CookieParams {
        &self.options.cookie
    }

    /// Replace the cookie parameters. Effective only before start;
    /// while active the call logs and changes nothing.
    pub fn set_cookie_params(&mut self, params: CookieParams) {
        if self.status.is_active() {
            warn!("Cookie parameters are frozen while a session is active");
            return;
        }
        self.options.cookie = params;
    }

    /// Read a variable. `None` means the key is absent; a stored JSON
    /// null reads as `Some(&Value::Null)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Write a variable in memory. Durable only after a commit.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Check whether a variable is present.
    pub fn has(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Number of variables in the in-memory map.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check whether the in-memory map is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The full in-memory variable map.
    pub fn vars(&self) -> &HashMap<String, Value> {
        &self.vars
    }

    fn lifetime(&self) -> Duration {
        Duration::from_secs(self.options.max_lifetime_secs)
    }

    /// Generate an id, retrying against live records while active.
    fn collision_free_id(&self, prefix: Option<&str>) -> Option<SessionId> {
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let id = self.ids.generate(prefix);
            if !self.status.is_active() {
                return Some(id);
            }
            match self.store.contains(&id) {
                Ok(false) => return Some(id),
                Ok(true) => continue,
                Err(err) => {
                    warn!("Store lookup failed while creating an id: {}", err);
                    return None;
                }
            }
        }
        warn!("Gave up finding a collision-free session id");
        None
    }
}
