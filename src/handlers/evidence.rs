//! Request-evidence extraction
//!
//! Pulls the pieces of authentication evidence out of a request so the
//! active strategy can consume the kind it owns.

use warp::filters::BoxedFilter;
use warp::Filter;

use crate::auth::strategy::AuthEvidence;
use crate::auth::token::extract_bearer_token;
use crate::constants::SESSION_COOKIE;

/// Assemble evidence from the Authorization header and the session cookie
pub fn collect_evidence(
    auth_header: Option<&str>,
    session_cookie: Option<String>,
) -> AuthEvidence {
    AuthEvidence {
        bearer: auth_header.and_then(extract_bearer_token),
        session_cookie,
    }
}

/// Warp filter extracting `AuthEvidence` from the request
pub fn evidence_filter() -> BoxedFilter<(AuthEvidence,)> {
    warp::header::optional::<String>("authorization")
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .map(|auth: Option<String>, cookie: Option<String>| {
            collect_evidence(auth.as_deref(), cookie)
        })
        .boxed()
}
