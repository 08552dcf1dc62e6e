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

//! Authorized-client credentials and the store that holds them.
//!
//! A credential is keyed by `(registration_id, subject)`. It is written once by
//! the login handshake and only ever read by the session bridge.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Bearer token issued to this client for one user of one provider.
///
/// The token is never empty: [`AuthorizedCredential::new`] returns `None`
/// instead, so a stored credential is always usable as far as the core can tell.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizedCredential {
    registration_id: String,
    subject: String,
    access_token: String,
}

impl AuthorizedCredential {
    pub fn new(
        registration_id: impl Into<String>,
        subject: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Option<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return None;
        }
        Some(Self {
            registration_id: registration_id.into(),
            subject: subject.into(),
            access_token,
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AuthorizedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedCredential")
            .field("registration_id", &self.registration_id)
            .field("subject", &self.subject)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Lookup of authorized clients by provider registration and subject.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load_authorized_client(
        &self,
        registration_id: &str,
        subject: &str,
    ) -> Option<AuthorizedCredential>;

    async fn save_authorized_client(&self, credential: AuthorizedCredential);
}

/// Process-local credential store. Contents are lost on restart, which sends
/// every browser back through the login handshake.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    clients: RwLock<HashMap<(String, String), AuthorizedCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load_authorized_client(
        &self,
        registration_id: &str,
        subject: &str,
    ) -> Option<AuthorizedCredential> {
        self.clients
            .read()
            .await
            .get(&(registration_id.to_string(), subject.to_string()))
            .cloned()
    }

    async fn save_authorized_client(&self, credential: AuthorizedCredential) {
        let key = (
            credential.registration_id.clone(),
            credential.subject.clone(),
        );
        self.clients.write().await.insert(key, credential);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_not_a_credential() {
        assert!(AuthorizedCredential::new("google", "sub-1", "").is_none());
        assert!(AuthorizedCredential::new("google", "sub-1", "   ").is_none());
        assert!(AuthorizedCredential::new("google", "sub-1", "ya29.token").is_some());
    }

    #[test]
    fn debug_output_hides_token() {
        let cred = AuthorizedCredential::new("google", "sub-1", "ya29.secret").unwrap();
        let rendered = format!("{cred:?}");
        assert!(!rendered.contains("ya29.secret"));
        assert!(rendered.contains("sub-1"));
    }

    #[tokio::test]
    async fn lookup_is_keyed_by_registration_and_subject() {
        let store = InMemoryCredentialStore::new();
        store
            .save_authorized_client(AuthorizedCredential::new("google", "sub-1", "tok-1").unwrap())
            .await;

        let found = store.load_authorized_client("google", "sub-1").await;
        assert_eq!(found.map(|c| c.access_token().to_string()), Some("tok-1".to_string()));
        assert!(store.load_authorized_client("google", "sub-2").await.is_none());
        assert!(store.load_authorized_client("okta", "sub-1").await.is_none());
    }

    #[tokio::test]
    async fn save_replaces_previous_token() {
        let store = InMemoryCredentialStore::new();
        store
            .save_authorized_client(AuthorizedCredential::new("google", "sub-1", "old").unwrap())
            .await;
        store
            .save_authorized_client(AuthorizedCredential::new("google", "sub-1", "new").unwrap())
            .await;

        let found = store.load_authorized_client("google", "sub-1").await.unwrap();
        assert_eq!(found.access_token(), "new");
    }
}
