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

//! OAuth route handlers: login and callback.
//!
//! A successful callback stores the user's access token as an authorized
//! credential, creates a server-side session, and hands the browser an opaque
//! session id in an `HttpOnly; SameSite=Lax` cookie named `session`.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use oauth2::{CsrfToken, PkceCodeChallenge};
use serde::Deserialize;

use crate::auth::build_session_cookie;
use crate::credential::AuthorizedCredential;
use crate::error::AppError;
use crate::oauth;
use crate::session::SessionRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub state: String,
    pub code: String,
}

/// GET /login
///
/// Initiates the OAuth flow: generates PKCE + CSRF, remembers the verifier,
/// redirects to the identity provider.
pub async fn login(State(state): State<AppState>) -> Result<Response, AppError> {
    let oauth_cfg = state
        .oauth
        .as_ref()
        .ok_or_else(AppError::oauth_not_configured)?;

    let csrf_token = CsrfToken::new_random();
    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    state
        .pending_logins
        .store(csrf_token.secret(), pkce_verifier.secret())
        .await;

    let auth_url =
        oauth::build_auth_url(oauth_cfg, pkce_challenge.as_str(), csrf_token.secret())?;

    Ok(Redirect::to(&auth_url).into_response())
}

/// GET /login/callback?state=...&code=...
///
/// Exchanges the authorization code for tokens, records the credential and the
/// session, and sets the session cookie.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let oauth_cfg = state
        .oauth
        .as_ref()
        .ok_or_else(AppError::oauth_not_configured)?;

    let pkce_verifier = state
        .pending_logins
        .take(&query.state)
        .await
        .ok_or_else(AppError::invalid_oauth_state)?;

    let tokens = oauth::exchange_code(oauth_cfg, &pkce_verifier, &query.code).await?;

    let id_token = tokens.id_token.as_deref().ok_or_else(|| {
        AppError::oauth_exchange_failed("token response has no id_token; is the openid scope requested?")
    })?;
    let principal = oauth::principal_from_id_token(id_token)?;

    let credential = AuthorizedCredential::new(
        state.registration_id.as_str(),
        principal.subject(),
        tokens.access_token.as_str(),
    )
    .ok_or_else(|| AppError::oauth_exchange_failed("token response has an empty access_token"))?;

    state.credentials.save_authorized_client(credential).await;

    let subject = principal.subject().to_string();
    let session_id = state
        .sessions
        .create(SessionRecord::new(principal, state.registration_id.as_str()))
        .await;

    let session_cookie = build_session_cookie(
        &session_id,
        state.session_ttl_secs,
        state.cookie_domain.as_deref(),
        state.cookie_secure,
    );
    let cookie = HeaderValue::from_str(&session_cookie)
        .map_err(|e| AppError::internal(&format!("invalid session cookie: {e}")))?;

    tracing::info!(
        "OAuth login successful for subject {}, redirecting to {}",
        subject,
        state.home_url
    );

    let mut response = Redirect::to(&state.home_url).into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);
    Ok(response)
}
