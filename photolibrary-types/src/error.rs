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

//! API error types.
//!
//! Every failed response is returned as `APIResponse<APIError>` with `success: false`.

use serde::{Deserialize, Serialize};

/// Structured error returned in the `result` field of a failed [`super::APIResponse`].
///
/// The `code` field is a machine-readable identifier (e.g. `"REMOTE_CALL_REJECTED"`).
/// The `message` field is a human-readable description suitable for display.
/// The `engineering_error` field carries upstream detail (status codes, response
/// bodies) useful for diagnostics.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIError {
    /// Machine-readable error code.
    pub code: String,

    /// Human-readable error message.
    pub message: String,

    /// Optional engineering-level detail for debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineering_error: Option<String>,
}

impl APIError {
    pub fn missing_parameter(name: &str) -> Self {
        Self {
            code: "MISSING_PARAMETER".to_string(),
            message: format!("Required query parameter '{name}' is missing"),
            engineering_error: None,
        }
    }

    pub fn remote_call_failed(detail: &str) -> Self {
        Self {
            code: "REMOTE_CALL_FAILED".to_string(),
            message: "The photo service could not be reached.".to_string(),
            engineering_error: Some(detail.to_string()),
        }
    }

    pub fn remote_call_rejected(status: u16, body: &str) -> Self {
        Self {
            code: "REMOTE_CALL_REJECTED".to_string(),
            message: format!("The photo service rejected the request (HTTP {status})."),
            engineering_error: Some(body.to_string()),
        }
    }

    pub fn malformed_remote_response(field: &str) -> Self {
        Self {
            code: "MALFORMED_REMOTE_RESPONSE".to_string(),
            message: format!("The photo service response is missing the '{field}' list."),
            engineering_error: None,
        }
    }

    pub fn invalid_oauth_state() -> Self {
        Self {
            code: "INVALID_OAUTH_STATE".to_string(),
            message: "The login attempt is unknown or has already been used.".to_string(),
            engineering_error: None,
        }
    }

    pub fn oauth_not_configured() -> Self {
        Self {
            code: "OAUTH_NOT_CONFIGURED".to_string(),
            message: "Sign-in is not configured on this server.".to_string(),
            engineering_error: None,
        }
    }

    pub fn oauth_exchange_failed(detail: &str) -> Self {
        Self {
            code: "OAUTH_EXCHANGE_FAILED".to_string(),
            message: "Sign-in could not be completed.".to_string(),
            engineering_error: Some(detail.to_string()),
        }
    }

    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: "An internal error occurred.".to_string(),
            engineering_error: Some(detail.to_string()),
        }
    }
}
