//! HTTP transport for Relearn.
//!
//! Provides [`ReqwestTransport`], the production implementation of the
//! `Transport` trait. Non-success statuses are returned as responses; only
//! failures to obtain a response become `TransportError`s.

use async_trait::async_trait;
use relearn_abstraction::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::{debug, error};

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    /// HTTP client for making requests.
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default `reqwest::Client`.
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    /// Creates a transport around an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Creates a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns a `TransportError` if the HTTP client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            TransportError::RequestError(format!("Failed to create HTTP client: {}", e))
        })?;
        Ok(Self { client })
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "Sending request");

        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url)
            .bearer_auth(&request.bearer_token);

        builder = match request.body {
            Some(ref body) => builder.json(body),
            // Bodiless POSTs still announce `Content-Length: 0`.
            None if request.method == HttpMethod::Post => builder.body(""),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, url = %request.url, "Request failed");
            if e.is_connect() {
                TransportError::RequestError(format!("Service not reachable at {}: {}", request.url, e))
            } else if e.is_timeout() {
                TransportError::RequestError(format!("Request to {} timed out", request.url))
            } else {
                TransportError::RequestError(format!("Network error: {}", e))
            }
        })?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = value.to_str().map_or_else(|_| "<binary>".to_string(), str::to_string);
                (name.as_str().to_string(), value)
            })
            .collect();

        let body = response.text().await.map_err(|e| {
            TransportError::SerializationError(format!("Failed to read response body: {}", e))
        })?;

        debug!(status = %status, body_len = body.len(), "Received response");

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            headers,
            body,
        })
    }
}
