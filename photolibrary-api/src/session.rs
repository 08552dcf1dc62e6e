/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Server-side sessions.
//!
//! The browser only ever holds an opaque [`SessionId`] in the `session`
//! cookie. Invalidating a session removes the record, so the same id can never
//! authorize another request; the user has to go through `/login` again.
//! Sessions also end on their own once they are older than the configured
//! lifetime.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::principal::Principal;

/// Session lifetime used when `SESSION_TTL_SECS` is not set.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// Opaque session handle carried by the browser.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only a prefix; the full id is a bearer secret.
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "SessionId({prefix}..)")
    }
}

/// What a live session knows about its user.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub principal: Principal,
    /// Provider registration the user authenticated with.
    pub registration_id: String,
    pub authenticated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(principal: Principal, registration_id: impl Into<String>) -> Self {
        Self {
            principal,
            registration_id: registration_id.into(),
            authenticated_at: Utc::now(),
        }
    }

    /// Whether the session is at least `ttl_secs` old.
    pub fn is_expired(&self, ttl_secs: i64) -> bool {
        Utc::now()
            .signed_duration_since(self.authenticated_at)
            .num_seconds()
            >= ttl_secs
    }
}

/// A session resolved for the current request.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub id: SessionId,
    pub record: SessionRecord,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, record: SessionRecord) -> SessionId;

    /// Look up a live session. Expired sessions read as absent.
    async fn get(&self, id: &SessionId) -> Option<SessionRecord>;

    /// Remove the session. Returns `false` when there was nothing to remove;
    /// invalidating twice is not an error.
    async fn invalidate(&self, id: &SessionId) -> bool;
}

/// Process-local session store. Expired records are evicted when read and
/// pruned whenever a new session is created.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
    ttl_secs: i64,
}

impl InMemorySessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl_secs,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, record: SessionRecord) -> SessionId {
        let id = SessionId::generate();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| !existing.is_expired(self.ttl_secs));
        sessions.insert(id.clone(), record);
        id
    }

    async fn get(&self, id: &SessionId) -> Option<SessionRecord> {
        let mut sessions = self.sessions.write().await;
        if sessions.get(id)?.is_expired(self.ttl_secs) {
            sessions.remove(id);
            tracing::debug!(session = ?id, "session expired");
            return None;
        }
        sessions.get(id).cloned()
    }

    async fn invalidate(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }
}
