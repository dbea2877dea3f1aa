//! Transport seam between the request executor and the wire.
//!
//! The executor only ever sees a [`RawResponse`] (status, `Retry-After`,
//! body text) or a [`TransportError`]. Tests inject a scripted transport;
//! production uses [`HttpTransport`], a thin reqwest wrapper that attaches
//! the fixed FirstPromoter headers to every request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::FirstPromoterConfig;
use crate::request::{Method, RequestSpec};

/// Matches the upstream's own client timeout; no additional timeout layer
/// is imposed on top of it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure raised by the transport itself (connection refused, DNS failure,
/// timeout). Distinct from an HTTP error response: a `TransportError` means
/// no response was received at all.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Wrap a transport failure message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The underlying failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A raw HTTP response as seen by the executor.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed integer `Retry-After` header (seconds), if present.
    pub retry_after: Option<u64>,
    /// Response body text.
    pub body: String,
}

impl RawResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues one physical HTTP request.
///
/// Implementations must be shareable across concurrent calls; the executor
/// holds the transport behind an `Arc`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] for network-level failures where no HTTP
    /// response was received. HTTP error statuses are NOT errors at this
    /// layer; they come back as a [`RawResponse`] for classification.
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse, TransportError>;
}

/// Production transport backed by reqwest.
///
/// Every request carries three fixed headers: the bearer-token
/// `Authorization` header (marked sensitive), the `Account-ID` header, and
/// a JSON content type.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the API key or account id contain invalid header
    /// characters.
    #[must_use]
    pub fn new(config: &FirstPromoterConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .expect("Invalid API key for header");
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        headers.insert(
            "Account-ID",
            HeaderValue::from_str(&config.account_id).expect("Invalid account id for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse, TransportError> {
        let url = format!(
            "{}/{}",
            self.base_url,
            request.endpoint.trim_start_matches('/')
        );

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_is_success() {
        let ok = RawResponse {
            status: 200,
            retry_after: None,
            body: String::new(),
        };
        assert!(ok.is_success());

        let created = RawResponse {
            status: 201,
            retry_after: None,
            body: String::new(),
        };
        assert!(created.is_success());

        let err = RawResponse {
            status: 404,
            retry_after: None,
            body: String::new(),
        };
        assert!(!err.is_success());
    }

    #[test]
    fn test_transport_error_message() {
        let err = TransportError::new("connection refused");
        assert_eq!(err.message(), "connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }
}
