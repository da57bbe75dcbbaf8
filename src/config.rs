//! Server configuration module
//! Handles configuration parameters for the authentication gate

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN_TTL_SECS};
use crate::error::{AuthGateError, Result};
use std::env;

/// Authentication strategy selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Stateless signed tokens carried in the Authorization header
    Token,
    /// Opaque session identifiers carried in a cookie
    Session,
    /// Sessions with a CSRF secret minted at login
    SessionCsrf,
}

impl AuthMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "token" | "jwt" => Ok(AuthMode::Token),
            "session" => Ok(AuthMode::Session),
            "session-csrf" | "session_csrf" => Ok(AuthMode::SessionCsrf),
            other => Err(AuthGateError::ConfigError(format!(
                "Unknown auth mode '{}'. Expected one of: token, session, session-csrf",
                other
            ))),
        }
    }

    /// Whether sessions receive a CSRF secret at creation
    pub fn mints_session_csrf(&self) -> bool {
        matches!(self, AuthMode::SessionCsrf)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Token => "token",
            AuthMode::Session => "session",
            AuthMode::SessionCsrf => "session-csrf",
        }
    }
}

/// Gate configuration parameters
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub host: String,
    pub port: u16,
    /// Active authentication strategy
    pub mode: AuthMode,
    /// JWT secret for token signing/validation; required in token mode
    pub jwt_secret: Option<String>,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Development mode (logged at startup, relaxes nothing in the core)
    pub development_mode: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        panic!("GateConfig::default() is not allowed for security reasons. Use GateConfig::from_env() instead.");
    }
}

impl GateConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing(mode: AuthMode) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            mode,
            jwt_secret: Some("unit-testing-signing-key-0123456789-never-production".to_string()),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            development_mode: true,
        }
    }

    /// Validate that the JWT secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(AuthGateError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "test-secret",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(AuthGateError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AuthGateError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols)".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("AUTH_GATE_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("AUTH_GATE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let mode = match env::var("AUTH_GATE_MODE") {
            Ok(raw) => AuthMode::parse(&raw)?,
            Err(_) => AuthMode::SessionCsrf,
        };

        let token_ttl_secs = env::var("AUTH_GATE_TOKEN_TTL_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        let jwt_secret = env::var("AUTH_GATE_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .ok();

        // The signing key is acquired once here and held for process lifetime
        if mode == AuthMode::Token {
            match &jwt_secret {
                Some(secret) => Self::validate_jwt_secret(secret)?,
                None => {
                    return Err(AuthGateError::ConfigError(
                        "AUTH_GATE_JWT_SECRET environment variable is required in token mode. \
                         Generate one with: openssl rand -base64 32"
                            .to_string(),
                    ))
                }
            }
        }

        let development_mode = env::var("AUTH_GATE_DEVELOPMENT_MODE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            mode,
            jwt_secret,
            token_ttl_secs,
            development_mode,
        })
    }
}
