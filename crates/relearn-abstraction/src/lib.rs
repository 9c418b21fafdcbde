//! Transport abstraction layer for Relearn.
//!
//! This module defines the HTTP capability the retrain workflow is written
//! against. Concrete transports live in `relearn-http`; tests use in-memory
//! implementations of the same trait.

pub mod failure;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use failure::format_failed_response;

/// Represents an error raised by the transport itself rather than by the remote service.
///
/// A non-success HTTP status is *not* a `TransportError`: it comes back as an
/// ordinary [`HttpResponse`] and callers decide what it means.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be delivered (e.g., host unreachable, connection reset).
    #[error("Request Error: {0}")]
    RequestError(String),

    /// A payload could not be encoded or a response body could not be decoded.
    #[error("Serialization Error: {0}")]
    SerializationError(String),

    /// Other unexpected errors.
    #[error("Other Transport Error: {0}")]
    Other(String),
}

/// HTTP verbs used by the retrain and update APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Returns the method name as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request: method, absolute URL, bearer credential and optional JSON body.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including any query string.
    pub url: String,
    /// Token sent as `Authorization: Bearer {token}`.
    pub bearer_token: String,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Creates a request without a body.
    pub fn new(method: HttpMethod, url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self { method, url: url.into(), bearer_token: bearer_token.into(), body: None }
    }

    pub fn get(url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url, bearer_token)
    }

    pub fn post(url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url, bearer_token)
    }

    pub fn patch(url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, url, bearer_token)
    }

    pub fn delete(url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url, bearer_token)
    }

    /// Attaches a JSON body serialized from `payload`.
    ///
    /// # Errors
    /// Returns `TransportError::SerializationError` if `payload` cannot be encoded.
    pub fn with_json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, TransportError> {
        let value = serde_json::to_value(payload).map_err(|e| {
            TransportError::SerializationError(format!("Failed to encode request body: {}", e))
        })?;
        self.body = Some(value);
        Ok(self)
    }
}

// Bearer tokens stay out of logs.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("bearer_token", &"<redacted>")
            .field("body", &self.body)
            .finish()
    }
}

/// A response as seen by the workflow: status, headers in arrival order, raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Canonical reason phrase, when the transport knows it (e.g., "Not Found").
    pub reason: Option<String>,
    /// Response headers as `(name, value)` pairs.
    pub headers: Vec<(String, String)>,
    /// Raw body text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response with no headers and no reason phrase.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, reason: None, headers: Vec::new(), body: body.into() }
    }

    /// Creates a `200` response whose body is `payload` encoded as JSON.
    ///
    /// # Errors
    /// Returns `TransportError::SerializationError` if `payload` cannot be encoded.
    pub fn json_ok<T: Serialize + ?Sized>(payload: &T) -> Result<Self, TransportError> {
        let body = serde_json::to_string(payload).map_err(|e| {
            TransportError::SerializationError(format!("Failed to encode response body: {}", e))
        })?;
        Ok(Self::new(200, body).with_header("Content-Type", "application/json"))
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// True for any 2xx status.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    /// Returns `TransportError::SerializationError` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|e| {
            TransportError::SerializationError(format!("Failed to parse response: {}", e))
        })
    }
}

/// A trait for sending HTTP requests.
///
/// Implementations must be `Send + Sync` so a single transport can be shared by
/// the submitter, poller and updater of one pipeline.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns whatever response the server produced.
    ///
    /// # Errors
    /// Returns a `TransportError` only when no response could be obtained.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_success_covers_2xx_only() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[test]
    fn test_request_debug_redacts_token() {
        let request = HttpRequest::get("https://example.test/jobs", "super-secret");
        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_with_json_sets_body() {
        let request = HttpRequest::patch("https://example.test", "k")
            .with_json(&json!({"Resources": []}))
            .unwrap();
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.body, Some(json!({"Resources": []})));
    }

    #[test]
    fn test_json_decodes_string_body() {
        let response = HttpResponse::new(200, r#""job-42""#);
        let id: String = response.json().unwrap();
        assert_eq!(id, "job-42");
    }

    #[test]
    fn test_json_reports_invalid_body() {
        let response = HttpResponse::new(200, "not json");
        let err = response.json::<String>().unwrap_err();
        assert!(matches!(err, TransportError::SerializationError(_)));
    }

    struct Echo;

    #[async_trait]
    impl Transport for Echo {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(200, request.url))
        }
    }

    #[tokio::test]
    async fn test_arc_transport_delegates() {
        let transport: Arc<dyn Transport> = Arc::new(Echo);
        let response = transport.send(HttpRequest::get("https://a.test/x", "k")).await.unwrap();
        assert_eq!(response.body, "https://a.test/x");
    }
}
