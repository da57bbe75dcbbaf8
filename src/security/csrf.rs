//! CSRF (Cross-Site Request Forgery) protection
//!
//! Two independent flows:
//!
//! 1. Session-bound: a secret minted alongside the session, exposed to the
//!    legitimate client only through the authenticated status read, and
//!    required in the `X-CSRF-Token` header on state-changing requests.
//! 2. Anonymous double-submit: a token set in a client-readable cookie and
//!    echoed back in the header. There is no server-side record; the
//!    cookie IS the record. A cross-origin attacker can induce the cookie
//!    to be sent but cannot read it or set the custom header, so equality
//!    proves same-origin intent.

use base64::Engine;
use rand::RngCore;

use crate::core::session::Session;
use crate::error::{AuthGateError, Result};
use crate::security::timing::constant_time_eq;

const TOKEN_BYTES: usize = 32;

fn random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Mint the CSRF secret stored alongside a session
pub fn mint_secret() -> String {
    random_token()
}

/// Issue an anonymous double-submit token
pub fn issue_anonymous() -> String {
    random_token()
}

/// Verify the anonymous double-submit pair.
///
/// Both values must be present and byte-equal; absence of either, or any
/// mismatch, is a hard rejection.
pub fn verify_anonymous(cookie: Option<&str>, header: Option<&str>) -> Result<()> {
    match (cookie, header) {
        (Some(cookie_value), Some(header_value))
            if constant_time_eq(cookie_value, header_value) =>
        {
            Ok(())
        }
        _ => Err(AuthGateError::CsrfMismatch),
    }
}

/// Verify a header-supplied value against the secret held by the session.
///
/// Sessions created without a CSRF secret reject every value.
pub fn verify_session_bound(header: Option<&str>, session: &Session) -> Result<()> {
    let secret = session
        .csrf_secret
        .as_deref()
        .ok_or(AuthGateError::CsrfMismatch)?;

    match header {
        Some(header_value) if constant_time_eq(header_value, secret) => Ok(()),
        _ => Err(AuthGateError::CsrfMismatch),
    }
}
