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

//! Application configuration loaded from environment variables.

use std::env;

use url::Url;

use crate::bridge::RejectedTokenPolicy;
use crate::session::DEFAULT_SESSION_TTL_SECS;

const DEFAULT_ALBUMS_URI: &str = "https://photoslibrary.googleapis.com/v1/albums";
const DEFAULT_PHOTOS_URI: &str = "https://photoslibrary.googleapis.com/v1/mediaItems:search";
const DEFAULT_SCOPES: &str =
    "openid email profile https://www.googleapis.com/auth/photoslibrary.readonly";

/// Configuration for the photo library front end.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8080").
    pub listen_addr: String,
    /// Display name of the identity provider shown on every view.
    pub authorizer: String,
    /// Resource server endpoint returning the user's albums.
    pub albums_uri: String,
    /// Resource server endpoint searching media items of an album.
    pub photos_uri: String,
    /// Identity provider end-session endpoint used for global logout.
    pub logout_url: Url,
    /// Where the browser is sent after a local session termination.
    pub home_url: String,
    /// What to do when the resource server answers 401 for a stored token.
    pub rejected_token_policy: RejectedTokenPolicy,
    /// Registration id of the configured provider (e.g. "google").
    pub registration_id: String,
    /// OAuth configuration. `None` if `OAUTH_CLIENT_ID` is unset or empty.
    pub oauth: Option<OAuthConfig>,
    /// Cookie domain (optional, e.g. ".example.com").
    pub cookie_domain: Option<String>,
    /// Whether cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// Session lifetime in seconds, counted from login.
    pub session_ttl_secs: i64,
}

/// Authorization-code flow configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub scopes: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required
    /// - `PHOTOLIBRARY_LOGOUT_URL`
    ///
    /// # Optional
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8080"`)
    /// - `PHOTOLIBRARY_AUTHORIZER` (default: `"Google"`)
    /// - `PHOTOLIBRARY_ALBUMS_URI`, `PHOTOLIBRARY_PHOTOS_URI` (Google Photos defaults)
    /// - `PHOTOLIBRARY_HOME_URL` (default: `"/"`)
    /// - `PHOTOLIBRARY_REJECTED_TOKEN_POLICY` (`surface` | `terminate`, default `surface`)
    /// - `OAUTH_REGISTRATION_ID` (default: `"google"`)
    /// - `COOKIE_DOMAIN`, `COOKIE_SECURE`
    /// - `SESSION_TTL_SECS` (default: `"3600"`)
    /// - OAuth: `OAUTH_CLIENT_ID`, `OAUTH_SECRET`, `OAUTH_REDIRECT_URL`,
    ///   `OAUTH_AUTH_URL`, `OAUTH_TOKEN_URL`, `OAUTH_SCOPES`
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|s| !s.trim().is_empty());

        let logout_raw = non_empty("PHOTOLIBRARY_LOGOUT_URL")
            .ok_or("PHOTOLIBRARY_LOGOUT_URL environment variable is required")?;
        let logout_url = Url::parse(&logout_raw)
            .map_err(|e| format!("PHOTOLIBRARY_LOGOUT_URL is not a valid URL: {e}"))?;

        let rejected_token_policy = match non_empty("PHOTOLIBRARY_REJECTED_TOKEN_POLICY") {
            Some(raw) => raw.parse::<RejectedTokenPolicy>()?,
            None => RejectedTokenPolicy::default(),
        };

        let cookie_secure = match non_empty("COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| format!("COOKIE_SECURE must be a boolean, got {raw:?}"))?,
            None => false,
        };

        let session_ttl_secs = match non_empty("SESSION_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or("SESSION_TTL_SECS must be a positive integer")?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        let oauth = non_empty("OAUTH_CLIENT_ID")
            .map(|client_id| {
                Ok::<_, String>(OAuthConfig {
                    client_id,
                    client_secret: non_empty("OAUTH_SECRET"),
                    redirect_url: non_empty("OAUTH_REDIRECT_URL")
                        .ok_or("OAUTH_REDIRECT_URL required when OAUTH_CLIENT_ID is set")?,
                    auth_url: non_empty("OAUTH_AUTH_URL").unwrap_or_else(|| {
                        "https://accounts.google.com/o/oauth2/v2/auth".to_string()
                    }),
                    token_url: non_empty("OAUTH_TOKEN_URL")
                        .unwrap_or_else(|| "https://oauth2.googleapis.com/token".to_string()),
                    scopes: non_empty("OAUTH_SCOPES").unwrap_or_else(|| DEFAULT_SCOPES.to_string()),
                })
            })
            .transpose()?;

        if let Some(cfg) = &oauth {
            Url::parse(&cfg.auth_url).map_err(|e| format!("OAUTH_AUTH_URL is not a valid URL: {e}"))?;
        }

        Ok(Self {
            listen_addr: non_empty("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            authorizer: non_empty("PHOTOLIBRARY_AUTHORIZER").unwrap_or_else(|| "Google".to_string()),
            albums_uri: non_empty("PHOTOLIBRARY_ALBUMS_URI")
                .unwrap_or_else(|| DEFAULT_ALBUMS_URI.to_string()),
            photos_uri: non_empty("PHOTOLIBRARY_PHOTOS_URI")
                .unwrap_or_else(|| DEFAULT_PHOTOS_URI.to_string()),
            logout_url,
            home_url: non_empty("PHOTOLIBRARY_HOME_URL").unwrap_or_else(|| "/".to_string()),
            rejected_token_policy,
            registration_id: non_empty("OAUTH_REGISTRATION_ID")
                .unwrap_or_else(|| "google".to_string()),
            oauth,
            cookie_domain: non_empty("COOKIE_DOMAIN"),
            cookie_secure,
            session_ttl_secs,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
