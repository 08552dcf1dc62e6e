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

//! Session bridge: connects an authenticated session to the resource server.
//!
//! Every protected operation runs the same steps:
//!
//! 1. Resolve the authorized credential for the session's
//!    `(registration_id, subject)`. If there is none, terminate the session and
//!    redirect home without touching the network.
//! 2. Build the [`RemoteRequest`] for the operation and send it once.
//! 3. Pull the expected list out of the response and hand it to the
//!    [`ViewAssembler`].
//!
//! Session state as seen from here:
//!
//! ```text
//! Authenticated --(credential absent)--> Terminated
//! Authenticated --(explicit logout)----> Terminated(Global)
//! ```
//!
//! Both end states are terminal; only a fresh login creates a new session.

use std::str::FromStr;
use std::sync::Arc;

use photolibrary_types::view::{ALBUM_LISTING_VIEW, PHOTOS_LISTING_VIEW, WELCOME_VIEW};
use photolibrary_types::ViewModel;
use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::credential::{AuthorizedCredential, CredentialStore};
use crate::resource::{RemoteRequest, RemoteResponse, ResourceClient, ResourceError};
use crate::session::{ActiveSession, SessionId, SessionStore};
use crate::view::ViewAssembler;

/// Page size sent with every media search. Passed through as a string, which
/// is what the resource server accepts.
pub const MEDIA_PAGE_SIZE: &str = "100";

/// How a `401 Unauthorized` from the resource server is handled.
///
/// A stored token the resource server no longer accepts can either surface
/// as a failed call (`Surface`) or be treated like a missing credential, so
/// the user is sent back through login (`Terminate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejectedTokenPolicy {
    #[default]
    Surface,
    Terminate,
}

impl FromStr for RejectedTokenPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(Self::Surface),
            "terminate" => Ok(Self::Terminate),
            other => Err(format!(
                "unknown rejected token policy {other:?}, expected \"surface\" or \"terminate\""
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum BridgeError {
    /// No credential stored for the session. Handled inside the bridge by
    /// terminating the session; never returned from a public operation.
    #[error("no authorized credential for the current session")]
    CredentialAbsent,

    #[error("resource server call failed: {0}")]
    RemoteCallFailed(#[source] ResourceError),

    #[error("resource server rejected the call (HTTP {status}): {body}")]
    RemoteCallRejected { status: u16, body: String },

    #[error("resource server response has no '{field}' list")]
    MalformedRemoteResponse { field: &'static str },
}

impl BridgeError {
    /// Stable name used as the `outcome` of log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CredentialAbsent => "credential_absent",
            Self::RemoteCallFailed(_) => "remote_call_failed",
            Self::RemoteCallRejected { .. } => "remote_call_rejected",
            Self::MalformedRemoteResponse { .. } => "malformed_remote_response",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationKind {
    /// Local session invalidated; browser goes home.
    Local,
    /// Local session invalidated and the identity provider asked to end its own.
    Global,
}

/// Redirect produced when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
    pub kind: TerminationKind,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeOutcome {
    Render(ViewModel),
    Redirect(Termination),
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    AlbumListing,
    MediaListing,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Self::AlbumListing => "album_listing",
            Self::MediaListing => "media_listing",
        }
    }

    fn view(self) -> &'static str {
        match self {
            Self::AlbumListing => ALBUM_LISTING_VIEW,
            Self::MediaListing => PHOTOS_LISTING_VIEW,
        }
    }

    /// Field of the resource server response holding the list.
    fn response_field(self) -> &'static str {
        match self {
            Self::AlbumListing => "albums",
            Self::MediaListing => "mediaItems",
        }
    }

    /// Field of the view model the list is exposed under.
    fn model_field(self) -> &'static str {
        match self {
            Self::AlbumListing => "albums",
            Self::MediaListing => "photos",
        }
    }
}

pub struct SessionBridge {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    resources: Arc<dyn ResourceClient>,
    assembler: ViewAssembler,
    albums_uri: String,
    photos_uri: String,
    logout_url: Url,
    home_url: String,
    rejected_token_policy: RejectedTokenPolicy,
}

impl SessionBridge {
    pub fn new(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        resources: Arc<dyn ResourceClient>,
    ) -> Self {
        Self {
            credentials,
            sessions,
            resources,
            assembler: ViewAssembler::new(config.authorizer.clone()),
            albums_uri: config.albums_uri.clone(),
            photos_uri: config.photos_uri.clone(),
            logout_url: config.logout_url.clone(),
            home_url: config.home_url.clone(),
            rejected_token_policy: config.rejected_token_policy,
        }
    }

    /// Landing view: user fields only, no remote call.
    pub fn home(&self, session: &ActiveSession) -> ViewModel {
        tracing::debug!(operation = "home", outcome = "rendered");
        self.assembler
            .assemble(WELCOME_VIEW, &session.record.principal, None)
    }

    /// `GET <albums-uri>` and render `album-listing`.
    pub async fn list_albums(&self, session: &ActiveSession) -> Result<BridgeOutcome, BridgeError> {
        let albums_uri = self.albums_uri.clone();
        self.run(Operation::AlbumListing, session, move |credential| {
            RemoteRequest::get(albums_uri).bearer(credential.access_token())
        })
        .await
    }

    /// `POST <photos-uri>` searching one album and render `photos-listing`.
    ///
    /// `album_id` is passed through verbatim.
    pub async fn list_photos(
        &self,
        session: &ActiveSession,
        album_id: &str,
    ) -> Result<BridgeOutcome, BridgeError> {
        let photos_uri = self.photos_uri.clone();
        let body = json!({ "albumId": album_id, "pageSize": MEDIA_PAGE_SIZE });
        self.run(Operation::MediaListing, session, move |credential| {
            Ok(RemoteRequest::post(photos_uri)
                .bearer(credential.access_token())?
                .json(body))
        })
        .await
    }

    /// Invalidate the session (if any) and redirect home.
    ///
    /// Idempotent: a missing or already invalidated session is a no-op. No
    /// call is made to the identity provider.
    pub async fn terminate_session(&self, session: Option<&SessionId>) -> Termination {
        if let Some(id) = session {
            if self.sessions.invalidate(id).await {
                tracing::info!(
                    outcome = "terminated",
                    "session invalidated, next request goes through login"
                );
            }
        }
        Termination {
            kind: TerminationKind::Local,
            location: self.home_url.clone(),
        }
    }

    /// Invalidate the session, then redirect to the identity provider's
    /// logout endpoint with `id_token_hint`.
    ///
    /// Without an ID token the provider cannot be told which session to end,
    /// so this degrades to a local termination.
    pub async fn global_logout(&self, session: &ActiveSession) -> Termination {
        let local = self.terminate_session(Some(&session.id)).await;

        let Some(id_token) = session.record.principal.id_token() else {
            tracing::warn!(
                operation = "logout",
                outcome = "terminated",
                "principal has no id token, skipping identity provider logout"
            );
            return local;
        };

        let mut location = self.logout_url.clone();
        location
            .query_pairs_mut()
            .append_pair("id_token_hint", id_token);

        tracing::info!(operation = "logout", outcome = "global_logout");
        Termination {
            kind: TerminationKind::Global,
            location: location.to_string(),
        }
    }

    async fn run<F>(
        &self,
        operation: Operation,
        session: &ActiveSession,
        build: F,
    ) -> Result<BridgeOutcome, BridgeError>
    where
        F: FnOnce(&AuthorizedCredential) -> Result<RemoteRequest, ResourceError>,
    {
        let result = self.fetch_list(operation, session, build).await;

        match result {
            Ok(list) => {
                tracing::info!(operation = operation.name(), outcome = "rendered");
                let view = self.assembler.assemble(
                    operation.view(),
                    &session.record.principal,
                    Some((operation.model_field(), list)),
                );
                Ok(BridgeOutcome::Render(view))
            }
            Err(err) if self.terminates_session(&err) => {
                tracing::info!(
                    operation = operation.name(),
                    outcome = err.kind(),
                    "terminating session"
                );
                Ok(BridgeOutcome::Redirect(
                    self.terminate_session(Some(&session.id)).await,
                ))
            }
            Err(err) => {
                tracing::warn!(
                    operation = operation.name(),
                    outcome = err.kind(),
                    error = %err,
                    "protected operation failed"
                );
                Err(err)
            }
        }
    }

    async fn fetch_list<F>(
        &self,
        operation: Operation,
        session: &ActiveSession,
        build: F,
    ) -> Result<Value, BridgeError>
    where
        F: FnOnce(&AuthorizedCredential) -> Result<RemoteRequest, ResourceError>,
    {
        let credential = self.resolve_credential(session).await?;
        let request = build(&credential).map_err(BridgeError::RemoteCallFailed)?;
        let response = self
            .resources
            .exchange(request)
            .await
            .map_err(BridgeError::RemoteCallFailed)?;
        extract_list(response, operation.response_field())
    }

    async fn resolve_credential(
        &self,
        session: &ActiveSession,
    ) -> Result<AuthorizedCredential, BridgeError> {
        let record = &session.record;
        self.credentials
            .load_authorized_client(&record.registration_id, record.principal.subject())
            .await
            .ok_or(BridgeError::CredentialAbsent)
    }

    fn terminates_session(&self, err: &BridgeError) -> bool {
        match err {
            BridgeError::CredentialAbsent => true,
            BridgeError::RemoteCallRejected { status, .. } => {
                self.rejected_token_policy == RejectedTokenPolicy::Terminate
                    && *status == StatusCode::UNAUTHORIZED.as_u16()
            }
            _ => false,
        }
    }
}

/// Check the status and take `field` out of the body. The field must be a list;
/// a missing field is not read as "no items".
fn extract_list(response: RemoteResponse, field: &'static str) -> Result<Value, BridgeError> {
    let RemoteResponse {
        status, mut body, ..
    } = response;

    if !status.is_success() {
        return Err(BridgeError::RemoteCallRejected {
            status: status.as_u16(),
            body: Value::Object(body).to_string(),
        });
    }

    match body.remove(field) {
        Some(list @ Value::Array(_)) => Ok(list),
        _ => Err(BridgeError::MalformedRemoteResponse { field }),
    }
}
