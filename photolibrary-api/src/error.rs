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

//! Application error type that implements Axum's `IntoResponse`.
//!
//! Every error is returned as `APIResponse<APIError>` with `success: false`,
//! paired with the appropriate HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use photolibrary_types::{APIError, APIResponse};

use crate::bridge::BridgeError;

/// Application-level error that pairs an HTTP status code with an [`APIError`].
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: APIError,
}

impl AppError {
    pub fn new(status: StatusCode, body: APIError) -> Self {
        Self { status, body }
    }

    pub fn missing_parameter(name: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, APIError::missing_parameter(name))
    }

    pub fn invalid_oauth_state() -> Self {
        Self::new(StatusCode::BAD_REQUEST, APIError::invalid_oauth_state())
    }

    pub fn oauth_not_configured() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            APIError::oauth_not_configured(),
        )
    }

    pub fn oauth_exchange_failed(detail: &str) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            APIError::oauth_exchange_failed(detail),
        )
    }

    pub fn internal(detail: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            APIError::internal_error(detail),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = APIResponse::error(self.body);
        (self.status, Json(body)).into_response()
    }
}

impl From<BridgeError> for AppError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::RemoteCallFailed(source) => Self::new(
                StatusCode::BAD_GATEWAY,
                APIError::remote_call_failed(&source.to_string()),
            ),
            BridgeError::RemoteCallRejected { status, body } => Self::new(
                StatusCode::BAD_GATEWAY,
                APIError::remote_call_rejected(status, &body),
            ),
            BridgeError::MalformedRemoteResponse { field } => Self::new(
                StatusCode::BAD_GATEWAY,
                APIError::malformed_remote_response(field),
            ),
            // The bridge turns this into a redirect before it can get here.
            BridgeError::CredentialAbsent => {
                Self::internal("credential absence was not handled by the session bridge")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    use crate::resource::ResourceError;

    /// Consume the response body and deserialize it to `APIResponse<APIError>`.
    async fn read_error_body(resp: Response) -> (StatusCode, APIResponse<APIError>) {
        let status = resp.status();
        let bytes = Body::new(resp.into_body())
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let parsed: APIResponse<APIError> =
            serde_json::from_slice(&bytes).expect("deserialize error body");
        (status, parsed)
    }

    #[tokio::test]
    async fn missing_parameter_produces_400() {
        let resp = AppError::missing_parameter("id").into_response();
        let (status, body) = read_error_body(resp).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.result.code, "MISSING_PARAMETER");
        assert!(body.result.message.contains("'id'"));
    }

    #[tokio::test]
    async fn remote_call_failed_produces_502() {
        let err = AppError::from(BridgeError::RemoteCallFailed(ResourceError::Decode {
            status: 200,
            reason: "expected a JSON object".to_string(),
        }));
        let (status, body) = read_error_body(err.into_response()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.result.code, "REMOTE_CALL_FAILED");
        assert!(body
            .result
            .engineering_error
            .as_deref()
            .unwrap_or_default()
            .contains("expected a JSON object"));
    }

    #[tokio::test]
    async fn remote_call_rejected_carries_upstream_detail() {
        let err = AppError::from(BridgeError::RemoteCallRejected {
            status: 403,
            body: r#"{"error":"PERMISSION_DENIED"}"#.to_string(),
        });
        let (status, body) = read_error_body(err.into_response()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.result.code, "REMOTE_CALL_REJECTED");
        assert!(body.result.message.contains("403"));
        assert_eq!(
            body.result.engineering_error.as_deref(),
            Some(r#"{"error":"PERMISSION_DENIED"}"#)
        );
    }

    #[tokio::test]
    async fn malformed_response_names_the_field() {
        let err = AppError::from(BridgeError::MalformedRemoteResponse {
            field: "mediaItems",
        });
        let (status, body) = read_error_body(err.into_response()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.result.code, "MALFORMED_REMOTE_RESPONSE");
        assert!(body.result.message.contains("mediaItems"));
    }

    #[tokio::test]
    async fn escaped_credential_absence_is_an_internal_error() {
        let (status, body) =
            read_error_body(AppError::from(BridgeError::CredentialAbsent).into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.result.code, "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn oauth_not_configured_produces_503() {
        let (status, body) = read_error_body(AppError::oauth_not_configured().into_response()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.result.code, "OAUTH_NOT_CONFIGURED");
    }
}
