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

//! Shared application state passed to every Axum handler via `State`.

use std::sync::Arc;

use crate::bridge::SessionBridge;
use crate::config::{Config, OAuthConfig};
use crate::credential::CredentialStore;
use crate::oauth::PendingLogins;
use crate::resource::ResourceClient;
use crate::session::SessionStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Protected operations and session termination.
    pub bridge: Arc<SessionBridge>,
    pub sessions: Arc<dyn SessionStore>,
    /// Written only by the login callback.
    pub credentials: Arc<dyn CredentialStore>,
    /// Logins started but not yet called back.
    pub pending_logins: Arc<PendingLogins>,
    /// OAuth configuration. `None` disables the login endpoints.
    pub oauth: Option<OAuthConfig>,
    /// Registration id recorded on sessions and credentials.
    pub registration_id: String,
    /// Landing page after login.
    pub home_url: String,
    /// Cookie domain (e.g. ".example.com"), or `None` for default.
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    /// Session lifetime, mirrored in the cookie's `Max-Age`.
    pub session_ttl_secs: i64,
}

impl AppState {
    pub fn new(
        config: &Config,
        sessions: Arc<dyn SessionStore>,
        credentials: Arc<dyn CredentialStore>,
        resources: Arc<dyn ResourceClient>,
    ) -> Self {
        let bridge = SessionBridge::new(config, credentials.clone(), sessions.clone(), resources);
        Self {
            bridge: Arc::new(bridge),
            sessions,
            credentials,
            pending_logins: Arc::new(PendingLogins::new()),
            oauth: config.oauth.clone(),
            registration_id: config.registration_id.clone(),
            home_url: config.home_url.clone(),
            cookie_domain: config.cookie_domain.clone(),
            cookie_secure: config.cookie_secure,
            session_ttl_secs: config.session_ttl_secs,
        }
    }
}
