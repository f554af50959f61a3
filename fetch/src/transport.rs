//! Network boundary.
//!
//! The fetcher only needs "a status code and a body, or a transport-level
//! failure". [`Transport`] expresses exactly that so tests and fault
//! harnesses can stand in for the network.

use std::future::Future;

use thiserror::Error;

use crate::http_client;

/// Status and full body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (DNS, connect, TLS, body read).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() {
            "connection failed"
        } else if err.is_timeout() {
            "transport timeout"
        } else if err.is_body() || err.is_decode() {
            "failed to read body"
        } else if err.is_redirect() {
            "too many redirects"
        } else {
            "request failed"
        };
        Self(format!("{kind}: {}", err.without_url()))
    }
}

/// Issues a GET for `url`.
pub trait Transport: Send + Sync {
    fn issue(&self, url: &str) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// [`Transport`] over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(http_client().clone())
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    async fn issue(&self, url: &str) -> Result<RawResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(301, "").is_success());
        assert!(!RawResponse::new(404, "").is_success());
    }

    #[tokio::test]
    async fn http_transport_returns_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new();
        let response = transport
            .issue(&format!("{}/users", server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"[]");
    }

    #[tokio::test]
    async fn http_transport_passes_error_statuses_through() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new();
        let response = transport
            .issue(&format!("{}/userss", server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn http_transport_reports_connection_failures() {
        // Port 9 (discard) on localhost is closed in test environments.
        let transport = HttpTransport::new();
        let err = transport.issue("http://127.0.0.1:9/users").await.unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
