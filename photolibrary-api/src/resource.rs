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

//! Outbound calls to the photo resource server.
//!
//! [`ResourceClient::exchange`] performs exactly one HTTP exchange. Any status
//! code the server answers with comes back as a [`RemoteResponse`]; only
//! transport problems and undecodable success bodies are errors here. Deciding
//! that a 4xx/5xx means failure is the caller's job.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised before a complete response could be obtained.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Connection refused, timeout, TLS failure, truncated body.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The bearer token cannot be carried in an HTTP header.
    #[error("invalid request header: {0}")]
    InvalidHeader(String),

    /// A success response whose body is not a JSON object.
    #[error("undecodable response body (HTTP {status}): {reason}")]
    Decode { status: u16, reason: String },
}

/// One request to the resource server.
#[derive(Debug, Clone)]
pub struct RemoteRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RemoteRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            method,
            url: url.into(),
            headers,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Attach `Authorization: Bearer <token>`.
    pub fn bearer(mut self, token: &str) -> Result<Self, ResourceError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ResourceError::InvalidHeader(e.to_string()))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Attach a JSON body and the matching `Content-Type`.
    pub fn json(mut self, body: Value) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(body);
        self
    }
}

/// A completed exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Map<String, Value>,
}

impl RemoteResponse {
    pub fn new(status: StatusCode, body: Map<String, Value>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }
}

#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn exchange(&self, request: RemoteRequest) -> Result<RemoteResponse, ResourceError>;
}

/// [`ResourceClient`] backed by `reqwest`. No retries, no caching.
#[derive(Debug, Clone, Default)]
pub struct HttpResourceClient {
    http: Client,
}

impl HttpResourceClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn exchange(&self, request: RemoteRequest) -> Result<RemoteResponse, ResourceError> {
        let RemoteRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.http.request(method.clone(), &url).headers(headers);
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        tracing::debug!(%method, %url, status = status.as_u16(), "resource server responded");

        Ok(RemoteResponse {
            status,
            headers,
            body: decode_body(status, &text)?,
        })
    }
}

/// Decode a response body into a JSON object.
///
/// Error bodies that are not JSON objects are kept as `{"message": <text>}` so
/// they still reach the diagnostics.
fn decode_body(status: StatusCode, text: &str) -> Result<Map<String, Value>, ResourceError> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) if status.is_success() => Err(ResourceError::Decode {
            status: status.as_u16(),
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) if status.is_success() => Err(ResourceError::Decode {
            status: status.as_u16(),
            reason: e.to_string(),
        }),
        _ => {
            let mut map = Map::new();
            map.insert("message".to_string(), Value::String(text.to_string()));
            Ok(map)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn bearer_header_is_sensitive() {
        let req = RemoteRequest::get("http://example.com").bearer("tok").unwrap();
        let value = req.headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value, "Bearer tok");
        assert!(value.is_sensitive());
        assert!(!format!("{req:?}").contains("Bearer tok"));
    }

    #[test]
    fn bearer_rejects_header_breaking_tokens() {
        let err = RemoteRequest::get("http://example.com")
            .bearer("tok\r\nX-Injected: 1")
            .unwrap_err();
        assert!(matches!(err, ResourceError::InvalidHeader(_)));
    }

    #[test]
    fn json_sets_content_type() {
        let req = RemoteRequest::post("http://example.com").json(json!({ "a": 1 }));
        assert_eq!(req.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(req.body, Some(json!({ "a": 1 })));
    }

    #[tokio::test]
    async fn get_sends_bearer_and_decodes_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/albums"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "albums": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let request = RemoteRequest::get(format!("{}/v1/albums", server.uri()))
            .bearer("tok-1")
            .unwrap();
        let response = HttpResourceClient::new().exchange(request).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.get("albums"), Some(&json!([])));
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/mediaItems:search"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "albumId": "abc", "pageSize": "100" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "mediaItems": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let request = RemoteRequest::post(format!("{}/v1/mediaItems:search", server.uri()))
            .bearer("tok-1")
            .unwrap()
            .json(json!({ "albumId": "abc", "pageSize": "100" }));
        let response = HttpResourceClient::new().exchange(request).await.unwrap();

        assert!(response.status.is_success());
        assert!(response.body.contains_key("mediaItems"));
    }

    #[tokio::test]
    async fn error_status_is_a_response_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "error": { "status": "UNAUTHENTICATED" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = HttpResourceClient::new()
            .exchange(RemoteRequest::get(server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.body.contains_key("error"));
    }

    #[tokio::test]
    async fn plain_text_error_body_is_kept_as_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .expect(1)
            .mount(&server)
            .await;

        let response = HttpResourceClient::new()
            .exchange(RemoteRequest::get(server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.body.get("message"), Some(&json!("upstream down")));
    }

    #[tokio::test]
    async fn non_object_success_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let err = HttpResourceClient::new()
            .exchange(RemoteRequest::get(server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ResourceError::Decode { status: 200, .. }));
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let response = HttpResourceClient::new()
            .exchange(RemoteRequest::get(server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let err = HttpResourceClient::new()
            .exchange(RemoteRequest::get("http://127.0.0.1:1/v1/albums"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResourceError::Transport(_)));
    }

    #[test]
    fn empty_body_decodes_to_empty_object() {
        assert!(decode_body(StatusCode::NO_CONTENT, "").unwrap().is_empty());
    }

    #[test]
    fn array_success_body_is_rejected() {
        let err = decode_body(StatusCode::OK, "[1,2]").unwrap_err();
        match err {
            ResourceError::Decode { reason, .. } => assert!(reason.contains("an array")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
