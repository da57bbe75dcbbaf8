use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::directory::{Principal, Role};
use crate::error::{AuthGateError, Result};

/// JWT claims carried by an issued token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Role embedded at issuance; never re-checked against the directory
    pub role: Role,
    /// Expiration time (UTC seconds)
    pub exp: usize,
}

fn unix_now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as usize
}

impl Claims {
    /// Creates claims for a principal, expiring `ttl_secs` from now
    pub fn new(principal: &Principal, ttl_secs: u64) -> Self {
        Self {
            sub: principal.username.clone(),
            role: principal.role,
            exp: unix_now() + ttl_secs as usize,
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        unix_now() > self.exp
    }
}

/// Manages JWT token operations with a process-lifetime key
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenManager {
    /// Creates a new token manager with a secret. The key material is
    /// never regenerated after construction.
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp must be strictly in the future; no leeway window
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Issue a signed token for the principal
    pub fn issue(&self, principal: &Principal) -> Result<String> {
        let claims = Claims::new(principal, self.ttl_secs);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthGateError::SystemError(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and recover its principal.
    ///
    /// Decode errors, signature mismatches and expiry all collapse into
    /// the same opaque error kind; callers cannot distinguish them.
    pub fn verify(&self, token: &str) -> Result<Principal> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthGateError::InvalidToken)?;

        Ok(Principal {
            username: data.claims.sub,
            role: data.claims.role,
        })
    }
}

/// Extracts a bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}
