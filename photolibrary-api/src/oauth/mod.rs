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

//! Authorization-code login against the configured identity provider:
//! PKCE bookkeeping, token exchange, and ID token claims extraction.

pub mod claims;
pub mod exchange;
pub mod pending;

pub use claims::{decode_id_token_claims, principal_from_id_token};
pub use exchange::{build_auth_url, exchange_code, OAuthTokenResponse};
pub use pending::PendingLogins;
