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

//! The authenticated user as seen by the identity layer.

use serde_json::{Map, Value};

/// Identity claims of the signed-in user.
///
/// Produced by the login handshake from the ID token and never modified
/// afterwards.
#[derive(Debug, Clone)]
pub struct Principal {
    subject: String,
    attributes: Map<String, Value>,
    id_token: Option<String>,
}

impl Principal {
    pub fn new(subject: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            subject: subject.into(),
            attributes,
            id_token: None,
        }
    }

    /// Attach the raw ID token the claims were read from.
    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = Some(id_token.into());
        self
    }

    /// Subject name (`sub` claim) the credential store is keyed by.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Claim value, `None` when the claim is absent or JSON `null`.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }
}
