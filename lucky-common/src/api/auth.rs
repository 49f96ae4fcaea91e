//! Admin session manager
//!
//! A single static admin credential unlocks the override editor. A successful
//! login issues an opaque token that stays valid for a fixed time from issue
//! (no sliding expiration). Only one session exists at a time: logging in
//! again overwrites the previous one.
//!
//! The session slot sits behind [`SessionStore`] so it can be replaced by a
//! multi-session or persisted implementation without touching handlers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::time::{Clock, SystemClock};
use crate::{uuid_utils, Error, Result};

/// Default session lifetime
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

/// The one admin username/password pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An issued admin session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Storage for admin sessions
pub trait SessionStore: Send + Sync {
    /// Install `session`, invalidating whatever was there
    fn replace(&self, session: AdminSession);

    fn current(&self) -> Option<AdminSession>;

    /// Remove the current session if it carries `token`; returns whether it did
    fn clear_matching(&self, token: &str) -> bool;
}

/// Process-wide single slot, lost on restart
#[derive(Debug, Default)]
pub struct SingleSlotSessionStore {
    slot: RwLock<Option<AdminSession>>,
}

impl SingleSlotSessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for SingleSlotSessionStore {
    fn replace(&self, session: AdminSession) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
    }

    fn current(&self) -> Option<AdminSession> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn clear_matching(&self, token: &str) -> bool {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().is_some_and(|s| s.token == token) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

/// Issues, validates and revokes admin sessions
pub struct AdminAuth {
    credentials: Option<AdminCredentials>,
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl AdminAuth {
    /// `credentials = None` disables admin login entirely
    pub fn new(
        credentials: Option<AdminCredentials>,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            credentials,
            sessions,
            clock,
            ttl,
        }
    }

    /// Single in-memory slot, wall clock, 30 minute sessions
    pub fn with_defaults(credentials: Option<AdminCredentials>) -> Self {
        Self::new(
            credentials,
            Arc::new(SingleSlotSessionStore::new()),
            Arc::new(SystemClock),
            Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Exchange the admin credential for a fresh token
    ///
    /// Unknown user and wrong password both fail as [`Error::Unauthorized`].
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        let valid = self
            .credentials
            .as_ref()
            .is_some_and(|c| c.matches(username, password));
        if !valid {
            warn!("Rejected admin login for '{}'", username);
            return Err(Error::Unauthorized);
        }

        let token = uuid_utils::generate().to_string();
        self.sessions.replace(AdminSession {
            token: token.clone(),
            created_at: self.clock.now(),
        });
        info!("Admin session issued");
        Ok(token)
    }

    /// Accept `token` only if it is the current session and not older than the TTL
    ///
    /// Expired and unknown tokens fail identically.
    pub fn authenticate(&self, token: &str) -> Result<()> {
        match self.sessions.current() {
            Some(session)
                if session.token == token
                    && self.clock.now() - session.created_at <= self.ttl =>
            {
                Ok(())
            }
            _ => Err(Error::Unauthorized),
        }
    }

    /// Server-side invalidation; a no-op for stale or unknown tokens
    pub fn logout(&self, token: &str) {
        if self.sessions.clear_matching(token) {
            info!("Admin session revoked");
        }
    }
}
