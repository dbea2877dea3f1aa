//! Integration test support for the FirstPromoter client.
//!
//! Provides [`MockTransport`], a scripted [`Transport`] implementation that
//! replays a fixed sequence of responses and counts how many physical
//! attempts the executor made. Tests build a client over it with
//! [`scripted_client`] and a fresh rate limiter, so no state is shared
//! between cases and no network is involved.
//!
//! ```rust,ignore
//! let (client, transport) = scripted_client(vec![
//!     response(500, ""),
//!     response(200, r#"{"ok":true}"#),
//! ]);
//!
//! let value = client.execute(RequestSpec::get("promoters")).await?;
//! assert_eq!(transport.calls(), 2);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use firstpromoter_client::{
    FirstPromoterClient, FirstPromoterConfig, RateLimiter, RawResponse, RequestSpec, Transport,
    TransportError,
};

/// One scripted transport result.
pub type ScriptedResult = Result<RawResponse, TransportError>;

/// Transport that replays a scripted sequence of responses.
///
/// Every `send` consumes the next script entry; an exhausted script yields
/// a transport error so a test that over-dispatches fails loudly.
pub struct MockTransport {
    script: Mutex<VecDeque<ScriptedResult>>,
    calls: AtomicUsize,
}

impl MockTransport {
    /// Create a transport that will serve the given responses in order.
    #[must_use]
    pub fn new(script: Vec<ScriptedResult>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of physical attempts the executor has made.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, _request: &RequestSpec) -> ScriptedResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("mock script exhausted")))
    }
}

/// A response with the given status and body.
#[must_use]
pub fn response(status: u16, body: &str) -> ScriptedResult {
    Ok(RawResponse {
        status,
        retry_after: None,
        body: body.to_string(),
    })
}

/// A response carrying a `Retry-After` header value in seconds.
#[must_use]
pub fn response_with_retry_after(status: u16, retry_after_secs: u64, body: &str) -> ScriptedResult {
    Ok(RawResponse {
        status,
        retry_after: Some(retry_after_secs),
        body: body.to_string(),
    })
}

/// A transport-level failure (no HTTP response at all).
#[must_use]
pub fn network_error(message: &str) -> ScriptedResult {
    Err(TransportError::new(message))
}

/// Build a client over a scripted transport with valid test credentials
/// and a fresh default rate limiter.
#[must_use]
pub fn scripted_client(script: Vec<ScriptedResult>) -> (FirstPromoterClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new(script));
    let config = FirstPromoterConfig::new("test-api-key", "test-account");
    let client =
        FirstPromoterClient::with_transport(config, transport.clone(), RateLimiter::default());
    (client, transport)
}
