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

//! Named views handed to the renderer.
//!
//! A [`ViewModel`] is a view name plus a flat map of field name to JSON value.
//! How it becomes markup is up to the consumer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Landing page shown after sign-in.
pub const WELCOME_VIEW: &str = "welcome";
/// Album list of the signed-in user.
pub const ALBUM_LISTING_VIEW: &str = "album-listing";
/// Media items of one album.
pub const PHOTOS_LISTING_VIEW: &str = "photos-listing";

/// View name plus the values it is rendered with.
///
/// # Example payload
///
/// ```json
/// {
///   "view": "album-listing",
///   "model": {
///     "authorizer": "Google",
///     "firstName": "Ada",
///     "lastName": null,
///     "email": "ada@example.com",
///     "picture": "/static/images/person.svg",
///     "albums": [{ "id": "1" }]
///   }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ViewModel {
    pub view: String,
    #[serde(default)]
    pub model: Map<String, Value>,
}

impl ViewModel {
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            model: Map::new(),
        }
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.model.insert(field.into(), value);
    }

    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.model.get(field)
    }
}
