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

//! Photo library server entry point.
//!
//! Serves album and photo listings for a signed-in user, fetched from the
//! photo resource server with the user's stored access token.

use std::sync::Arc;

use photolibrary_api::config::Config;
use photolibrary_api::credential::InMemoryCredentialStore;
use photolibrary_api::resource::HttpResourceClient;
use photolibrary_api::routes;
use photolibrary_api::session::InMemorySessionStore;
use photolibrary_api::state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("failed to load configuration");

    if config.oauth.is_none() {
        tracing::warn!("OAUTH_CLIENT_ID is not set, /login is disabled");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState::new(
        &config,
        Arc::new(InMemorySessionStore::new(config.session_ttl_secs)),
        Arc::new(InMemoryCredentialStore::new()),
        Arc::new(HttpResourceClient::new()),
    );
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!("Photo library listening on {}", config.listen_addr);

    axum::serve(listener, app).await.expect("server error");
}
