//! In-memory session store
//!
//! Sessions bind an opaque unguessable identifier to a principal. They
//! persist until explicit destruction: the client cookie's Max-Age bounds
//! client-side retention only, so `destroy` is the sole removal path.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::directory::{Principal, Role};
use crate::error::{AuthGateError, Result};
use crate::security::csrf;

/// Server-held session record. Owned exclusively by the store; the
/// identifier is the only artifact handed to callers.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub username: String,
    /// Fixed at creation; a later role change in the directory does not
    /// affect live sessions.
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Exposed only through the authenticated status read, never serialized
    #[serde(skip_serializing)]
    pub csrf_secret: Option<String>,
}

/// Manages session records behind a single shared lock
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session for the principal and return its identifier.
    /// When `mint_csrf` is set, a CSRF secret is minted alongside.
    pub async fn create(&self, principal: &Principal, mint_csrf: bool) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = Session {
            username: principal.username.clone(),
            role: principal.role,
            created_at: Utc::now(),
            csrf_secret: mint_csrf.then(csrf::mint_secret),
        };

        self.sessions.write().await.insert(session_id.clone(), session);
        log::debug!("Session created for {}", principal.username);

        session_id
    }

    /// Pure lookup; no mutation, no expiry check
    pub async fn resolve(&self, session_id: &str) -> Result<Session> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or(AuthGateError::NoSession)
    }

    /// Idempotent removal; destroying an unknown id is not an error
    pub async fn destroy(&self, session_id: &str) {
        if self.sessions.write().await.remove(session_id).is_some() {
            log::debug!("Session destroyed");
        }
    }

    /// Current number of live sessions
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// Thread-safe session store handle
pub type SharedSessionStore = Arc<SessionStore>;

// Create a new shared session store
pub fn create_session_store() -> SharedSessionStore {
    Arc::new(SessionStore::new())
}
