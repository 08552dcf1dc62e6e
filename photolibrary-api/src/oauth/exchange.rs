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

//! Auth URL construction and authorization code → token exchange.

use serde::Deserialize;
use url::Url;

use crate::config::OAuthConfig;
use crate::error::AppError;

/// Raw response from the OAuth token endpoint.
#[derive(Deserialize, Clone)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
}

impl std::fmt::Debug for OAuthTokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthTokenResponse")
            .field("access_token", &"<redacted>")
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Build the authorization URL with a PKCE S256 challenge. Parameters are
/// URL-encoded.
pub fn build_auth_url(
    cfg: &OAuthConfig,
    code_challenge: &str,
    csrf_state: &str,
) -> Result<String, AppError> {
    let mut url = Url::parse(&cfg.auth_url)
        .map_err(|e| AppError::internal(&format!("OAUTH_AUTH_URL is not a valid URL: {e}")))?;

    url.query_pairs_mut()
        .append_pair("client_id", &cfg.client_id)
        .append_pair("redirect_uri", &cfg.redirect_url)
        .append_pair("response_type", "code")
        .append_pair("scope", &cfg.scopes)
        .append_pair("code_challenge", code_challenge)
        .append_pair("code_challenge_method", "S256")
        .append_pair("state", csrf_state);

    Ok(url.to_string())
}

/// Exchange an authorization code for tokens at the token endpoint.
pub async fn exchange_code(
    cfg: &OAuthConfig,
    code_verifier: &str,
    authorization_code: &str,
) -> Result<OAuthTokenResponse, AppError> {
    let mut params = vec![
        ("grant_type", "authorization_code"),
        ("redirect_uri", cfg.redirect_url.as_str()),
        ("client_id", cfg.client_id.as_str()),
        ("code", authorization_code),
        ("code_verifier", code_verifier),
    ];

    // Only confidential clients send a secret.
    if let Some(secret) = cfg.client_secret.as_deref() {
        params.push(("client_secret", secret));
    }

    let response = reqwest::Client::new()
        .post(&cfg.token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| AppError::oauth_exchange_failed(&format!("token request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("OAuth token request failed. Status: {status}, Body: {body}");
        return Err(AppError::oauth_exchange_failed(&format!(
            "token endpoint returned HTTP {status}"
        )));
    }

    response
        .json::<OAuthTokenResponse>()
        .await
        .map_err(|e| AppError::oauth_exchange_failed(&format!("Failed to parse token response: {e}")))
}
