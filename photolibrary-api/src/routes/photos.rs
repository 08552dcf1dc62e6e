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

//! Protected view handlers.
//!
//! Views are returned as `APIResponse<ViewModel>` JSON. When the bridge ends the
//! session instead of rendering, the browser is redirected and its cookie is
//! cleared.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use photolibrary_types::{APIResponse, ViewModel};
use serde::Deserialize;

use crate::auth::{build_clear_session_cookie, CurrentSession};
use crate::bridge::{BridgeOutcome, Termination};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AlbumQuery {
    pub id: Option<String>,
}

/// GET / -- the landing view.
pub async fn home(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<APIResponse<ViewModel>> {
    Json(APIResponse::ok(state.bridge.home(&session)))
}

/// GET /photolibrary/albums
pub async fn albums(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Response, AppError> {
    let outcome = state.bridge.list_albums(&session).await?;
    Ok(outcome_response(&state, outcome))
}

/// GET /photolibrary/pics?id=<albumId>
pub async fn pics(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<AlbumQuery>,
) -> Result<Response, AppError> {
    let album_id = query
        .id
        .ok_or_else(|| AppError::missing_parameter("id"))?;

    let outcome = state.bridge.list_photos(&session, &album_id).await?;
    Ok(outcome_response(&state, outcome))
}

/// GET /photolibrary/logout -- end the local session and the provider's.
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Response {
    let termination = state.bridge.global_logout(&session).await;
    termination_response(&state, termination)
}

fn outcome_response(state: &AppState, outcome: BridgeOutcome) -> Response {
    match outcome {
        BridgeOutcome::Render(view) => Json(APIResponse::ok(view)).into_response(),
        BridgeOutcome::Redirect(termination) => termination_response(state, termination),
    }
}

fn termination_response(state: &AppState, termination: Termination) -> Response {
    let clear = build_clear_session_cookie(state.cookie_domain.as_deref(), state.cookie_secure);
    let mut response = Redirect::to(&termination.location).into_response();
    if let Ok(value) = HeaderValue::from_str(&clear) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
