//! The HTTP exchange behind a [`Connector`](crate::Connector).
//!
//! This module provides the [`Transport`] trait which abstracts the underlying HTTP client,
//! enabling mocking in tests, and [`HttpTransport`], the `reqwest` backed implementation.

use std::sync::OnceLock;

use reqwest::{
    Client, StatusCode,
    header::{CONTENT_TYPE, HeaderMap},
};
use tracing::debug;
use url::Url;

use crate::config::Credentials;

/// Header carrying the session token, in both directions.
pub const SESSION_ID_HEADER: &str = "x-transmission-session-id";

/// A single POST to the RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The endpoint.
    pub url: Url,
    /// Value for the session header, possibly empty.
    pub session_id: String,
    /// The JSON encoded request.
    pub body: String,
    /// Basic authentication credentials, if any.
    pub credentials: Option<Credentials>,
}

/// A response exactly as received from the daemon.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The undecoded response body.
    pub body: String,
}

impl RawResponse {
    /// Returns the value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Sends one request and hands back the raw response.
///
/// Implementations must not interpret the status code; a `409` or `401` is a successful
/// exchange at this level.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Performs the exchange.
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, reqwest::Error>;
}

/// [`Transport`] over a `reqwest` client that is created on first use.
#[derive(Debug)]
pub struct HttpTransport {
    accept_invalid_certs: bool,
    client: OnceLock<Client>,
}

impl HttpTransport {
    /// Creates the transport. No client is built until the first request.
    pub fn new(accept_invalid_certs: bool) -> Self {
        Self {
            accept_invalid_certs,
            client: OnceLock::new(),
        }
    }

    /// Whether invalid TLS certificates are accepted.
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    fn client(&self) -> Result<&Client, reqwest::Error> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        debug!(
            "Building HTTP client, accept_invalid_certs={}",
            self.accept_invalid_certs
        );
        let client = Client::builder()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, reqwest::Error> {
        let mut builder = self
            .client()?
            .post(request.url)
            .header(SESSION_ID_HEADER, request.session_id)
            .header(CONTENT_TYPE, "application/json")
            .body(request.body);
        if let Some(credentials) = request.credentials {
            builder = builder.basic_auth(credentials.username, Some(credentials.password));
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[tokio::test]
    async fn client_is_built_lazily() {
        let transport = HttpTransport::new(true);
        assert!(transport.client.get().is_none());

        transport.client().unwrap();
        assert!(transport.client.get().is_some());
        assert!(transport.accept_invalid_certs());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_ID_HEADER, HeaderValue::from_static("abc"));
        let response = RawResponse {
            status: StatusCode::CONFLICT,
            headers,
            body: String::new(),
        };

        assert_eq!(response.header("X-Transmission-Session-Id"), Some("abc"));
        assert_eq!(response.header("content-type"), None);
    }
}
