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

//! The JSON wrapper around every photo library response.
//!
//! A rendered page arrives as a [`ViewModel`](crate::ViewModel) under
//! `result`, with `success` set. Any failure carries an [`APIError`] instead,
//! with `success` cleared, so a client branches on one flag before reading
//! `result`.

use serde::{Deserialize, Serialize};

use crate::error::APIError;

/// `{ "success": <bool>, "result": <view or error> }`.
///
/// Album listing:
///
/// ```json
/// { "success": true, "result": { "view": "album-listing", "model": { "albums": [] } } }
/// ```
///
/// Photo API answered 403:
///
/// ```json
/// { "success": false, "result": { "code": "REMOTE_CALL_REJECTED", "engineering_error": "{...}" } }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIResponse<A: Serialize> {
    pub success: bool,
    pub result: A,
}

impl<A: Serialize> APIResponse<A> {
    /// A rendered view or other successful payload.
    pub fn ok(result: A) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

impl APIResponse<APIError> {
    /// The body every `AppError` is rendered as.
    pub fn error(err: APIError) -> Self {
        Self {
            success: false,
            result: err,
        }
    }
}
