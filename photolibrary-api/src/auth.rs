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

//! Axum extractor that resolves the `session` cookie to a live server-side session.
//!
//! Requests without a live session never reach a protected handler: they are
//! redirected to `/login`, and a stale cookie is cleared on the way.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};

use crate::session::{ActiveSession, SessionId};
use crate::state::AppState;

/// Name of the cookie carrying the opaque session id.
pub const SESSION_COOKIE: &str = "session";

/// Where unauthenticated browsers are sent.
pub const LOGIN_PATH: &str = "/login";

/// Build a `Set-Cookie` header value for a new session that lives `ttl_secs`.
pub fn build_session_cookie(
    id: &SessionId,
    ttl_secs: i64,
    domain: Option<&str>,
    secure: bool,
) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_secs}",
        id.as_str()
    );
    append_cookie_attributes(&mut cookie, domain, secure);
    cookie
}

/// Build a `Set-Cookie` header that clears the `session` cookie.
pub fn build_clear_session_cookie(domain: Option<&str>, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    append_cookie_attributes(&mut cookie, domain, secure);
    cookie
}

fn append_cookie_attributes(cookie: &mut String, domain: Option<&str>, secure: bool) {
    if secure {
        cookie.push_str("; Secure");
    }
    if let Some(d) = domain {
        cookie.push_str(&format!("; Domain={d}"));
    }
}

/// Read the session id from the `Cookie` header, if present and non-empty.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    let prefix = format!("{SESSION_COOKIE}=");

    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().strip_prefix(prefix.as_str()))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(SessionId::from)
}

/// Extractor for handlers that need the signed-in user.
///
/// Usage in a handler:
/// ```ignore
/// async fn my_handler(CurrentSession(session): CurrentSession) { ... }
/// ```
#[derive(Debug)]
pub struct CurrentSession(pub ActiveSession);

/// Rejection for [`CurrentSession`]: redirect to the login entry point.
#[derive(Debug)]
pub struct LoginRedirect {
    clear_cookie: Option<String>,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        let mut response = Redirect::to(LOGIN_PATH).into_response();
        if let Some(cookie) = self.clear_cookie {
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let Some(id) = session_id_from_headers(&parts.headers) else {
            return Err(LoginRedirect { clear_cookie: None });
        };

        match state.sessions.get(&id).await {
            Some(record) => Ok(CurrentSession(ActiveSession { id, record })),
            None => {
                tracing::debug!(session = ?id, "unknown or invalidated session, redirecting to login");
                Err(LoginRedirect {
                    clear_cookie: Some(build_clear_session_cookie(
                        state.cookie_domain.as_deref(),
                        state.cookie_secure,
                    )),
                })
            }
        }
    }
}
