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

//! In-flight logins: CSRF state → PKCE verifier, consumed by the callback.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// How long a user has to finish signing in at the provider.
const PENDING_LOGIN_TTL: Duration = Duration::from_secs(10 * 60);

struct PendingLogin {
    pkce_verifier: String,
    started_at: Instant,
}

/// Logins started by `/login` and not yet completed.
///
/// Each entry can be taken once; a replayed callback finds nothing.
#[derive(Default)]
pub struct PendingLogins {
    requests: RwLock<HashMap<String, PendingLogin>>,
}

impl PendingLogins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the verifier for `csrf_state`, dropping expired entries.
    pub async fn store(&self, csrf_state: &str, pkce_verifier: &str) {
        let mut requests = self.requests.write().await;
        requests.retain(|_, login| login.started_at.elapsed() < PENDING_LOGIN_TTL);
        requests.insert(
            csrf_state.to_string(),
            PendingLogin {
                pkce_verifier: pkce_verifier.to_string(),
                started_at: Instant::now(),
            },
        );
    }

    /// Consume the login for `csrf_state`, returning its PKCE verifier.
    pub async fn take(&self, csrf_state: &str) -> Option<String> {
        let login = self.requests.write().await.remove(csrf_state)?;
        if login.started_at.elapsed() >= PENDING_LOGIN_TTL {
            return None;
        }
        Some(login.pkce_verifier)
    }
}
