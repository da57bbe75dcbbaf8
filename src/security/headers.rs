//! Security headers for HTTP responses

use warp::Reply;

/// Strict Content Security Policy for API endpoints
const STRICT_CSP: &str = "default-src 'none'; connect-src 'self'; frame-ancestors 'none';";

/// Wrap a reply with strict security headers for API endpoints
pub fn with_api_security_headers<T: Reply>(reply: T) -> impl Reply {
    let reply = warp::reply::with_header(reply, "X-Frame-Options", "DENY");
    let reply = warp::reply::with_header(reply, "X-Content-Type-Options", "nosniff");
    let reply = warp::reply::with_header(reply, "Referrer-Policy", "no-referrer");
    let reply = warp::reply::with_header(reply, "Content-Security-Policy", STRICT_CSP);
    warp::reply::with_header(reply, "Cache-Control", "no-cache, no-store, must-revalidate")
}
