//! Request descriptions handed to the executor.
//!
//! A [`RequestSpec`] captures one logical API call independent of transport:
//! endpoint path, method, optional JSON body, and ordered query parameters.
//! Specs are built once by the caller and consumed by
//! [`FirstPromoterClient::execute`](crate::FirstPromoterClient::execute).

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP methods accepted by the FirstPromoter API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Fetch a resource or listing.
    #[default]
    Get,
    /// Create a resource or trigger a batch action.
    Post,
    /// Update an existing resource.
    Put,
    /// Remove a resource.
    Delete,
}

impl Method {
    /// Wire representation of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical API call.
///
/// `endpoint` is relative to the configured base URL (e.g. `"promoters"` or
/// `"referrals/123"`). Query pairs keep their insertion order when encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Endpoint path relative to the API base URL.
    pub endpoint: String,
    /// HTTP method to use.
    pub method: Method,
    /// Optional JSON body (POST/PUT payloads).
    pub body: Option<serde_json::Value>,
    /// Ordered query parameters.
    pub query: Vec<(String, String)>,
}

impl RequestSpec {
    /// Create a spec with the given method and endpoint.
    #[must_use]
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
            query: Vec::new(),
        }
    }

    /// Create a GET spec.
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    /// Create a POST spec.
    #[must_use]
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    /// Create a PUT spec.
    #[must_use]
    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Put, endpoint)
    }

    /// Create a DELETE spec.
    #[must_use]
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    /// Append a query parameter, preserving insertion order.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}
