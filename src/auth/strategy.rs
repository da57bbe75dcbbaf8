//! Pluggable authentication strategies
//!
//! One access core parameterized by an `AuthStrategy`: the router extracts
//! evidence from the request, the active strategy turns it into a
//! principal (or a failure), and the gate decides from there. The token
//! and session variants are selected once at startup.

use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::directory::Principal;
use crate::auth::token::TokenManager;
use crate::config::{AuthMode, GateConfig};
use crate::core::session::SharedSessionStore;
use crate::error::{AuthGateError, Result};

/// Authentication evidence extracted from a request by the router
#[derive(Debug, Clone, Default)]
pub struct AuthEvidence {
    /// Bearer token from the Authorization header, if any
    pub bearer: Option<String>,
    /// Opaque session identifier from the session cookie, if any
    pub session_cookie: Option<String>,
}

/// Artifact handed to the client after a successful login
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Token { token: String },
    Session { session_id: String },
}

/// A credential lifecycle: turn a validated principal into a client-held
/// artifact, and later turn request evidence back into a principal.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Issue the client-held artifact for a validated principal
    async fn login(&self, principal: &Principal) -> Result<LoginOutcome>;

    /// Re-derive the principal from request evidence
    async fn authenticate(&self, evidence: &AuthEvidence) -> Result<Principal>;

    /// Discard whatever server-side state the evidence points at
    async fn logout(&self, evidence: &AuthEvidence) -> Result<()>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Stateless signed-token strategy
pub struct TokenAuth {
    tokens: TokenManager,
}

impl TokenAuth {
    pub fn new(tokens: TokenManager) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl AuthStrategy for TokenAuth {
    async fn login(&self, principal: &Principal) -> Result<LoginOutcome> {
        let token = self.tokens.issue(principal)?;
        Ok(LoginOutcome::Token { token })
    }

    async fn authenticate(&self, evidence: &AuthEvidence) -> Result<Principal> {
        let token = evidence
            .bearer
            .as_deref()
            .ok_or(AuthGateError::MissingAuthHeader)?;
        self.tokens.verify(token)
    }

    async fn logout(&self, _evidence: &AuthEvidence) -> Result<()> {
        // Tokens have no destruction step; they become unverifiable at exp
        Ok(())
    }

    fn name(&self) -> &'static str {
        "token"
    }
}

/// Opaque-session-identifier strategy backed by the shared store
pub struct SessionAuth {
    store: SharedSessionStore,
    mint_csrf: bool,
}

impl SessionAuth {
    pub fn new(store: SharedSessionStore, mint_csrf: bool) -> Self {
        Self { store, mint_csrf }
    }
}

#[async_trait]
impl AuthStrategy for SessionAuth {
    async fn login(&self, principal: &Principal) -> Result<LoginOutcome> {
        let session_id = self.store.create(principal, self.mint_csrf).await;
        Ok(LoginOutcome::Session { session_id })
    }

    async fn authenticate(&self, evidence: &AuthEvidence) -> Result<Principal> {
        let session_id = evidence
            .session_cookie
            .as_deref()
            .ok_or(AuthGateError::NoSession)?;
        let session = self.store.resolve(session_id).await?;

        Ok(Principal {
            username: session.username,
            role: session.role,
        })
    }

    async fn logout(&self, evidence: &AuthEvidence) -> Result<()> {
        if let Some(session_id) = evidence.session_cookie.as_deref() {
            self.store.destroy(session_id).await;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "session"
    }
}

/// Build the strategy selected by configuration
pub fn build_strategy(
    config: &GateConfig,
    store: SharedSessionStore,
) -> Result<Arc<dyn AuthStrategy>> {
    match config.mode {
        AuthMode::Token => {
            let secret = config.jwt_secret.as_deref().ok_or_else(|| {
                AuthGateError::ConfigError("Token mode requires a JWT secret".to_string())
            })?;
            let tokens = TokenManager::new(secret, config.token_ttl_secs);
            Ok(Arc::new(TokenAuth::new(tokens)))
        }
        AuthMode::Session => Ok(Arc::new(SessionAuth::new(store, false))),
        AuthMode::SessionCsrf => Ok(Arc::new(SessionAuth::new(store, true))),
    }
}
