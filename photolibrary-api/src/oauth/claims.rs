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

//! ID token claims.
//!
//! The ID token is read without signature verification: it arrives straight
//! from the token endpoint over TLS in response to our own code exchange.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::principal::Principal;

/// Decode the payload segment of a JWT into its claims object.
pub fn decode_id_token_claims(id_token: &str) -> Result<Map<String, Value>, AppError> {
    let claims_b64 = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| AppError::oauth_exchange_failed("Invalid id_token format"))?;

    // Some providers pad their segments even though JWTs should not be.
    let claims_bytes = URL_SAFE_NO_PAD
        .decode(claims_b64.trim_end_matches('='))
        .map_err(|e| {
            AppError::oauth_exchange_failed(&format!("Failed to base64-decode id_token: {e}"))
        })?;

    serde_json::from_slice(&claims_bytes).map_err(|e| {
        AppError::oauth_exchange_failed(&format!("Failed to parse id_token claims: {e}"))
    })
}

/// Build the [`Principal`] for an ID token. The `sub` claim is required; it
/// is the subject name credentials are stored under.
pub fn principal_from_id_token(id_token: &str) -> Result<Principal, AppError> {
    let claims = decode_id_token_claims(id_token)?;
    let subject = claims
        .get("sub")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::oauth_exchange_failed("id_token has no sub claim"))?
        .to_string();

    Ok(Principal::new(subject, claims).with_id_token(id_token))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn jwt(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","kid":"k1"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }

    #[test]
    fn principal_carries_claims_and_token() {
        let token = jwt(json!({
            "sub": "10769150350006150715113082367",
            "email": "ada@example.com",
            "given_name": "Ada",
            "picture": "https://example.com/ada.png"
        }));
        let principal = principal_from_id_token(&token).unwrap();

        assert_eq!(principal.subject(), "10769150350006150715113082367");
        assert_eq!(principal.attribute("given_name"), Some(&json!("Ada")));
        assert_eq!(principal.id_token(), Some(token.as_str()));
    }

    #[test]
    fn padded_payload_is_accepted() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"a"}"#);
        let claims = decode_id_token_claims(&format!("{header}.{payload}.")).unwrap();
        assert_eq!(claims.get("sub"), Some(&json!("a")));
    }

    #[test]
    fn missing_sub_is_rejected() {
        let err = principal_from_id_token(&jwt(json!({ "email": "a@b.com" }))).unwrap_err();
        assert_eq!(err.body.code, "OAUTH_EXCHANGE_FAILED");
    }

    #[test]
    fn token_without_segments_is_rejected() {
        let err = decode_id_token_claims("not-a-jwt").unwrap_err();
        assert_eq!(
            err.body.engineering_error.as_deref(),
            Some("Invalid id_token format")
        );
    }

    #[test]
    fn non_json_payload_is_rejected() {
        let payload = URL_SAFE_NO_PAD.encode("plain text");
        assert!(decode_id_token_claims(&format!("h.{payload}.s")).is_err());
    }
}
