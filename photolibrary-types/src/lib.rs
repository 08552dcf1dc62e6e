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

//! Shared types for the photo library front end.
//!
//! This crate defines the contract between the service and whatever renders
//! its output: the named views produced by protected operations and the JSON
//! envelope used for failures. It carries no HTTP or OAuth types.

pub mod error;
pub mod responses;
pub mod view;

pub use error::APIError;
pub use responses::APIResponse;
pub use view::ViewModel;
