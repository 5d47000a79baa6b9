//! REST API handlers.
//!
//! The `/flow/*` handlers walk one full session lifecycle across
//! separate requests, the way a browser following redirects would, and
//! fail loudly when any step observes something other than the
//! contract. `/session` offers plain cookie-identified access.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use serde_json::Value;

use super::cookie::{expired_cookie, request_session_id, session_cookie};
use super::types::{
    DestroySessionResponse, ErrorResponse, FlowQuery, FlowStepResponse, FlowSummaryResponse,
    SessionSnapshotResponse, UpdateSessionRequest, UpdateSessionResponse,
};
use crate::session::{
    IdGenerator, MemoryStore, RandomIdGenerator, Session, SessionId, SessionOptions,
    SessionStore, StartOptions,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub ids: Arc<dyn IdGenerator>,
    pub options: SessionOptions,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            ids: Arc::new(RandomIdGenerator::new()),
            options,
        }
    }

    /// Build the per-request facade, adopting the id carried by the
    /// request cookie when one is present.
    pub fn session(
        &self,
        headers: &HeaderMap,
    ) -> Result<Session, (StatusCode, Json<ErrorResponse>)> {
        let mut session = self.bare_session();
        if let Some(raw) = request_session_id(headers, &self.options.name) {
            let id = SessionId::parse(raw.as_str()).map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::invalid_session_id(&raw)),
                )
            })?;
            session.set_id(id);
        }
        Ok(session)
    }

    /// Build a facade with no request context.
    pub fn bare_session(&self) -> Session {
        Session::new(
            Arc::clone(&self.store),
            Arc::clone(&self.ids),
            self.options.clone(),
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// API information endpoint.
pub async fn api_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "session-bridge",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

fn check_failed(step: &str, detail: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::check_failed(step, detail)),
    )
}

fn lifecycle_error(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::lifecycle_error(message)),
    )
}

/// 303 to the next step, carrying the session id in the cookie.
fn step_redirect(session: &Session, step: &str, next: &str) -> Response {
    let cookie = match session.id() {
        Some(id) => session_cookie(session.name(), id, session.cookie_params()),
        None => expired_cookie(session.name(), session.cookie_params()),
    };
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, next.to_string()),
            (header::SET_COOKIE, cookie),
        ],
        Json(FlowStepResponse::passed(step)),
    )
        .into_response()
}

/// Entry point of the lifecycle chain. Drops any previous session
/// cookie so the chain always begins from a clean slate.
pub async fn flow_entry(State(state): State<AppState>) -> Response {
    let cookie = expired_cookie(&state.options.name, &state.options.cookie);
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/flow/seed".to_string()),
            (header::SET_COOKIE, cookie),
        ],
        Json(FlowStepResponse::passed("entry")),
    )
        .into_response()
}

/// Start a fresh session and commit the values later steps check for.
pub async fn flow_seed(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mut session = state.session(&headers)?;
    if !session.start() {
        return Err(lifecycle_error("start failed at seed"));
    }

    session.set("greeting", "hello");
    session.set("counter", 1);
    if !session.commit() {
        return Err(lifecycle_error("commit failed at seed"));
    }

    Ok(step_redirect(&session, "seed", "/flow/persisted"))
}

/// Verify the committed values survived into a second request.
pub async fn flow_persisted(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mut session = state.session(&headers)?;
    if !session.start() {
        return Err(lifecycle_error("start failed at persisted"));
    }

    if session.get("greeting") != Some(&Value::from("hello")) {
        return Err(check_failed("persisted", "greeting did not survive commit"));
    }

    session.set("counter", 2);
    if !session.commit() {
        return Err(lifecycle_error("commit failed at persisted"));
    }

    Ok(step_redirect(&session, "persisted", "/flow/regenerate"))
}

/// Swap the session id, handing the superseded one to the next step.
pub async fn flow_regenerate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mut session = state.session(&headers)?;
    if !session.start() {
        return Err(lifecycle_error("start failed at regenerate"));
    }

    if !session.has("greeting") {
        return Err(check_failed("regenerate", "greeting missing before regeneration"));
    }

    let old_id = match session.id() {
        Some(id) => id.clone(),
        None => return Err(lifecycle_error("no id on an active session")),
    };

    if !session.regenerate_id(false) {
        return Err(lifecycle_error("id regeneration failed"));
    }
    if !session.commit() {
        return Err(lifecycle_error("commit failed at regenerate"));
    }

    let next = format!("/flow/clear?old_id={}", old_id);
    Ok(step_redirect(&session, "regenerate", &next))
}

/// Verify the regeneration took, then clear every variable.
pub async fn flow_clear(
    State(state): State<AppState>,
    Query(query): Query<FlowQuery>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let Some(old_raw) = query.old_id else {
        return Err(check_failed("clear", "old_id parameter missing"));
    };
    let old_id = SessionId::parse(old_raw.as_str())
        .map_err(|_| check_failed("clear", "old_id parameter is not a valid id"))?;

    let mut session = state.session(&headers)?;
    if !session.start() {
        return Err(lifecycle_error("start failed at clear"));
    }

    if session.id() == Some(&old_id) {
        return Err(check_failed("clear", "session id did not change"));
    }
    if session.get("greeting") != Some(&Value::from("hello")) {
        return Err(check_failed("clear", "variables lost across regeneration"));
    }

    // The superseded record was not deleted, so it must still be
    // readable until garbage collection claims it.
    let mut stale = state.bare_session();
    stale.set_id(old_id);
    if !stale.start_with(StartOptions::read_only()) {
        return Err(lifecycle_error("read-only start failed at clear"));
    }
    if !stale.has("greeting") {
        return Err(check_failed("clear", "superseded record already gone"));
    }

    session.unset();
    if !session.is_empty() {
        return Err(check_failed("clear", "unset left variables behind"));
    }
    if !session.commit() {
        return Err(lifecycle_error("commit failed at clear"));
    }

    Ok(step_redirect(&session, "clear", "/flow/status"))
}

/// Watch the status flip from none to active across a start.
pub async fn flow_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mut session = state.session(&headers)?;

    if session.status().is_active() {
        return Err(check_failed("status", "active before start"));
    }
    if !session.start() {
        return Err(lifecycle_error("start failed at status"));
    }
    if !session.status().is_active() {
        return Err(check_failed("status", "not active after start"));
    }
    if session.has("greeting") {
        return Err(check_failed("status", "cleared variable reappeared"));
    }

    session.set("doomed", "x");
    if !session.commit() {
        return Err(lifecycle_error("commit failed at status"));
    }

    Ok(step_redirect(&session, "status", "/flow/destroy"))
}

/// Destroy the backing record and verify a restart comes up empty.
pub async fn flow_destroy(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mut session = state.session(&headers)?;
    if !session.start() {
        return Err(lifecycle_error("start failed at destroy"));
    }
    if !session.has("doomed") {
        return Err(check_failed("destroy", "expected variable missing"));
    }

    if !session.destroy() {
        return Err(lifecycle_error("destroy failed"));
    }
    if session.status().is_active() {
        return Err(check_failed("destroy", "still active after destroy"));
    }

    if !session.start() {
        return Err(lifecycle_error("restart failed at destroy"));
    }
    if session.has("doomed") || !session.is_empty() {
        return Err(check_failed("destroy", "destroyed record came back"));
    }

    session.set("marker", "staged");
    if !session.commit() {
        return Err(lifecycle_error("commit failed at destroy"));
    }

    Ok(step_redirect(&session, "destroy", "/flow/abort"))
}

/// Verify an aborted change never reaches the store.
pub async fn flow_abort(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mut session = state.session(&headers)?;
    if !session.start() {
        return Err(lifecycle_error("start failed at abort"));
    }
    if session.get("marker") != Some(&Value::from("staged")) {
        return Err(check_failed("abort", "expected marker missing"));
    }

    session.set("marker", "changed");
    if !session.abort() {
        return Err(lifecycle_error("abort failed"));
    }

    if !session.start() {
        return Err(lifecycle_error("restart failed at abort"));
    }
    if session.get("marker") != Some(&Value::from("staged")) {
        return Err(check_failed("abort", "aborted change was persisted"));
    }
    if !session.commit() {
        return Err(lifecycle_error("commit failed at abort"));
    }

    Ok(step_redirect(&session, "abort", "/flow/done"))
}

/// Close out the chain with a read-only summary of the final record.
pub async fn flow_done(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mut session = state.session(&headers)?;
    if !session.start_with(StartOptions::read_only()) {
        return Err(lifecycle_error("read-only start failed at done"));
    }

    let id = match session.id() {
        Some(id) => id.clone(),
        None => return Err(lifecycle_error("no id after read-only start")),
    };
    let cookie = session_cookie(session.name(), &id, session.cookie_params());
    let summary = FlowSummaryResponse {
        passed: true,
        id: id.to_string(),
        vars: session.vars().clone(),
    };

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(summary),
    )
        .into_response())
}

/// Read-only snapshot of the session named by the request cookie.
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionSnapshotResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request_session_id(&headers, &state.options.name).is_none() {
        return Err((StatusCode::NOT_FOUND, Json(ErrorResponse::no_session())));
    }

    let mut session = state.session(&headers)?;
    if !session.start_with(StartOptions::read_only()) {
        return Err(lifecycle_error("read-only start failed"));
    }

    Ok(Json(SessionSnapshotResponse::from_session(&session)))
}

/// Merge variables into the session and commit. Establishes a new
/// session when the request carries no cookie.
pub async fn put_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mut session = state.session(&headers)?;
    if !session.start() {
        return Err(lifecycle_error("start failed"));
    }

    for (key, value) in req.vars {
        session.set(key, value);
    }
    let count = session.len();

    if !session.commit() {
        return Err(lifecycle_error("commit failed"));
    }

    let id = match session.id() {
        Some(id) => id.clone(),
        None => return Err(lifecycle_error("no id after start")),
    };
    let cookie = session_cookie(session.name(), &id, session.cookie_params());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UpdateSessionResponse {
            id: id.to_string(),
            count,
        }),
    )
        .into_response())
}

/// Destroy the session named by the request cookie.
pub async fn delete_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    if request_session_id(&headers, &state.options.name).is_none() {
        return Err((StatusCode::NOT_FOUND, Json(ErrorResponse::no_session())));
    }

    let mut session = state.session(&headers)?;
    if !session.start() {
        return Err(lifecycle_error("start failed"));
    }
    let destroyed = session.destroy();

    let cookie = expired_cookie(session.name(), session.cookie_params());
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(DestroySessionResponse { destroyed }),
    )
        .into_response())
}
