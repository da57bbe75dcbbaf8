//! HTTP route tree for the authentication gate
//!
//! Thin glue between the wire and the core: every route extracts evidence
//! or body data, calls into the directory, strategy, store, gate or CSRF
//! guard, and renders the result. All failure mapping lives in one place
//! (`handle_rejection`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

use crate::auth::directory::{Principal, Role, UserDirectory};
use crate::auth::strategy::{build_strategy, AuthEvidence, AuthStrategy, LoginOutcome};
use crate::config::GateConfig;
use crate::constants::{
    ANON_CSRF_COOKIE, ANON_CSRF_MAX_AGE_SECS, CSRF_HEADER, SESSION_COOKIE,
    SESSION_COOKIE_MAX_AGE_SECS,
};
use crate::core::access::{AccessGate, ResourceClass};
use crate::core::session::{create_session_store, Session, SharedSessionStore};
use crate::error::AuthGateError;
use crate::handlers::evidence::evidence_filter;
use crate::security::csrf;
use crate::security::headers::with_api_security_headers;

impl warp::reject::Reject for AuthGateError {}

/// Shared per-process state injected into every handler
#[derive(Clone)]
pub struct GateContext {
    pub directory: Arc<UserDirectory>,
    pub strategy: Arc<dyn AuthStrategy>,
    pub sessions: SharedSessionStore,
}

impl GateContext {
    /// Build the directory, store and configured strategy once; the
    /// result is injected into the route tree by reference, never held as
    /// ambient process state.
    pub fn from_config(config: &GateConfig) -> crate::error::Result<Self> {
        let sessions = create_session_store();
        let strategy = build_strategy(config, sessions.clone())?;

        Ok(Self {
            directory: Arc::new(UserDirectory::demo()),
            strategy,
            sessions,
        })
    }
}

// ---------- Request/response shapes ----------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub username: String,
    pub role: Role,
}

impl From<&Principal> for UserView {
    fn from(principal: &Principal) -> Self {
        Self {
            username: principal.username.clone(),
            role: principal.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub session: Session,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf: Option<String>,
}

impl StatusResponse {
    fn anonymous() -> Self {
        Self {
            logged_in: false,
            username: None,
            role: None,
            csrf: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PublicMessageRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

// ---------- Cookie construction ----------

fn session_cookie(session_id: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, session_id, SESSION_COOKIE_MAX_AGE_SECS
    )
}

fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

// Not HttpOnly: the client must be able to read it back into the header
fn anon_csrf_cookie(token: &str) -> String {
    format!(
        "{}={}; SameSite=Lax; Path=/; Max-Age={}",
        ANON_CSRF_COOKIE, token, ANON_CSRF_MAX_AGE_SECS
    )
}

// ---------- Route tree ----------

/// Build the complete route tree over the given context
pub fn routes(ctx: GateContext) -> BoxedFilter<(warp::reply::Response,)> {
    let api = login_route(ctx.clone())
        .or(logout_route(ctx.clone()))
        .or(session_route(ctx.clone()))
        .or(status_route(ctx.clone()))
        .or(check_route(ctx))
        .or(csrf_anon_route())
        .or(public_message_route());

    let health = warp::path("health").and(warp::get()).map(|| "OK");

    api.or(health)
        .recover(handle_rejection)
        .map(|reply| with_api_security_headers(reply).into_response())
        .boxed()
}

fn with_ctx(
    ctx: GateContext,
) -> impl Filter<Extract = (GateContext,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

fn login_route(
    ctx: GateContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "login")
        .and(warp::post())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with_ctx(ctx))
        .and_then(handle_login)
}

fn logout_route(
    ctx: GateContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "logout")
        .and(warp::post())
        .and(evidence_filter())
        .and(with_ctx(ctx))
        .and_then(handle_logout)
}

fn session_route(
    ctx: GateContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "session")
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(with_ctx(ctx))
        .and_then(handle_session_info)
}

fn status_route(
    ctx: GateContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "status")
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(with_ctx(ctx))
        .and_then(handle_status)
}

fn check_route(
    ctx: GateContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "check")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(evidence_filter())
        .and(with_ctx(ctx))
        .and_then(handle_check)
}

fn csrf_anon_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "csrf-anon")
        .and(warp::get())
        .and_then(handle_csrf_anon)
}

fn public_message_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "public-message")
        .and(warp::post())
        .and(warp::cookie::optional::<String>(ANON_CSRF_COOKIE))
        .and(warp::header::optional::<String>(CSRF_HEADER))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::bytes())
        .and_then(handle_public_message)
}

// ---------- Handlers ----------

async fn handle_login(
    request: LoginRequest,
    ctx: GateContext,
) -> Result<warp::reply::Response, Rejection> {
    let principal = ctx
        .directory
        .validate(&request.username, &request.password)
        .map_err(warp::reject::custom)?;

    let outcome = ctx
        .strategy
        .login(&principal)
        .await
        .map_err(warp::reject::custom)?;

    log::info!(
        "Login succeeded for {} via {} strategy",
        principal.username,
        ctx.strategy.name()
    );

    let reply = match outcome {
        LoginOutcome::Token { token } => {
            let body = LoginResponse {
                token: Some(token),
                user: UserView::from(&principal),
            };
            warp::reply::json(&body).into_response()
        }
        LoginOutcome::Session { session_id } => {
            let body = LoginResponse {
                token: None,
                user: UserView::from(&principal),
            };
            warp::reply::with_header(
                warp::reply::json(&body),
                "set-cookie",
                session_cookie(&session_id),
            )
            .into_response()
        }
    };

    Ok(reply)
}

async fn handle_logout(
    evidence: AuthEvidence,
    ctx: GateContext,
) -> Result<impl Reply, Rejection> {
    // Always succeeds; discarding a missing or unknown session is a no-op
    if let Err(e) = ctx.strategy.logout(&evidence).await {
        log::warn!("Logout cleanup failed: {}", e);
    }

    let body = serde_json::json!({ "ok": true, "message": "Logged out" });
    Ok(warp::reply::with_header(
        warp::reply::json(&body),
        "set-cookie",
        clear_session_cookie(),
    ))
}

async fn handle_session_info(
    cookie: Option<String>,
    ctx: GateContext,
) -> Result<impl Reply, Rejection> {
    let session_id = cookie.ok_or_else(|| warp::reject::custom(AuthGateError::NoSession))?;
    let session = ctx
        .sessions
        .resolve(&session_id)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&SessionResponse {
        session_id,
        session,
    }))
}

async fn handle_status(
    cookie: Option<String>,
    ctx: GateContext,
) -> Result<impl Reply, Rejection> {
    let status = match cookie {
        Some(session_id) => match ctx.sessions.resolve(&session_id).await {
            Ok(session) => StatusResponse {
                logged_in: true,
                username: Some(session.username),
                role: Some(session.role),
                csrf: session.csrf_secret,
            },
            Err(_) => StatusResponse::anonymous(),
        },
        None => StatusResponse::anonymous(),
    };

    Ok(warp::reply::json(&status))
}

async fn handle_check(
    query: HashMap<String, String>,
    evidence: AuthEvidence,
    ctx: GateContext,
) -> Result<impl Reply, Rejection> {
    let resource = ResourceClass::from_query(query.get("resource").map(String::as_str));

    let principal = ctx
        .strategy
        .authenticate(&evidence)
        .await
        .map_err(warp::reject::custom)?;

    AccessGate::check(&principal, &resource).map_err(warp::reject::custom)?;

    log::debug!("Access granted: {} -> {:?}", principal.username, resource);
    Ok(warp::reply::json(&serde_json::json!({ "ok": true })))
}

async fn handle_csrf_anon() -> Result<impl Reply, Rejection> {
    let token = csrf::issue_anonymous();
    let body = serde_json::json!({ "csrfToken": token });

    Ok(warp::reply::with_header(
        warp::reply::json(&body),
        "set-cookie",
        anon_csrf_cookie(&token),
    ))
}

async fn handle_public_message(
    cookie: Option<String>,
    header: Option<String>,
    body: Bytes,
) -> Result<impl Reply, Rejection> {
    // CSRF is checked before the body is even parsed
    csrf::verify_anonymous(cookie.as_deref(), header.as_deref())
        .map_err(warp::reject::custom)?;

    let request: PublicMessageRequest = serde_json::from_slice(&body).map_err(|_| {
        warp::reject::custom(AuthGateError::InvalidInput("Invalid JSON".to_string()))
    })?;

    if let Some(message) = &request.message {
        log::info!("Anonymous message received: {}", message);
    }

    Ok(warp::reply::json(&serde_json::json!({
        "ok": true,
        "message": "Thank you for your message!"
    })))
}

// ---------- Failure mapping ----------

fn status_for(err: &AuthGateError) -> (StatusCode, String) {
    match err {
        AuthGateError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        AuthGateError::InvalidCredentials
        | AuthGateError::MissingAuthHeader
        | AuthGateError::InvalidToken
        | AuthGateError::NoSession
        | AuthGateError::InsufficientRole
        | AuthGateError::AdminRequired => (StatusCode::UNAUTHORIZED, err.to_string()),
        AuthGateError::CsrfMismatch => (StatusCode::FORBIDDEN, err.to_string()),
        AuthGateError::UnknownResource(_) => {
            (StatusCode::BAD_REQUEST, "Unknown resource".to_string())
        }
        AuthGateError::ConfigError(_) | AuthGateError::SystemError(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    }
}

/// Map every rejection to a terminal JSON error response
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(gate_err) = err.find::<AuthGateError>() {
        status_for(gate_err)
    } else if err.is_not_found() || err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (StatusCode::BAD_REQUEST, "Invalid JSON".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::BAD_REQUEST, "Request body too large".to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some()
        || err.find::<warp::reject::InvalidHeader>().is_some()
    {
        (StatusCode::BAD_REQUEST, "Invalid request".to_string())
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    let body = warp::reply::json(&ErrorBody { error: message });
    Ok(warp::reply::with_status(body, status))
}
