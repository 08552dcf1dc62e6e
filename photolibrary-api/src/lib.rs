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

//! Photo library front end.
//!
//! This crate provides the Axum router, the session bridge that turns a
//! signed-in user into calls against the photo resource server, application
//! state, and configuration. The binary entry point (`main.rs`) is a thin
//! wrapper that calls into this library.

pub mod auth;
pub mod bridge;
pub mod config;
pub mod credential;
pub mod error;
pub mod oauth;
pub mod principal;
pub mod resource;
pub mod routes;
pub mod session;
pub mod state;
pub mod view;
