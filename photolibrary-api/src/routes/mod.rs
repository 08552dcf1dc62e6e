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

//! Axum router configuration for the photo library front end.

pub mod oauth;
pub mod photos;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        // Login handshake
        .route("/login", get(oauth::login))
        .route("/login/callback", get(oauth::callback))
        // Protected views
        .route("/", get(photos::home))
        .route("/photolibrary/albums", get(photos::albums))
        .route("/photolibrary/pics", get(photos::pics))
        .route("/photolibrary/logout", get(photos::logout))
}
