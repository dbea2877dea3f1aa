//! Request executor: admission, dispatch, retry, and classification.
//!
//! One [`FirstPromoterClient::execute`] call owns the full lifecycle of a
//! logical API call. Every physical attempt passes rate-limit admission
//! first (retries consume rate budget too), transient failures are retried
//! with bounded exponential backoff, and every terminal outcome is exactly
//! one classified error.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, instrument, warn};

use crate::config::FirstPromoterConfig;
use crate::error::FirstPromoterError;
use crate::rate_limit::RateLimiter;
use crate::request::RequestSpec;
use crate::transport::{HttpTransport, RawResponse, Transport};

/// Retries after the initial attempt (4 attempts total).
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff: 1s, 2s, 4s for attempts 0, 1, 2.
const BACKOFF_BASE_MS: u64 = 1000;

/// FirstPromoter API client.
///
/// Cheap to clone; concurrent `execute` calls share the transport and the
/// rate limiter, nothing else.
#[derive(Clone)]
pub struct FirstPromoterClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: FirstPromoterConfig,
    transport: Arc<dyn Transport>,
    limiter: RateLimiter,
}

/// Outcome of one physical attempt.
enum AttemptOutcome {
    /// 2xx with a parsed body (or null for an empty one).
    Success { value: Value, status: u16 },
    /// Transient failure worth another attempt.
    Retry {
        /// HTTP status, or `None` for a transport-level failure.
        status: Option<u16>,
        /// Raw error body, or the transport's message.
        body: String,
        /// Parsed `Retry-After` header in seconds.
        retry_after: Option<u64>,
    },
    /// Failure that must not be retried.
    Fatal(FirstPromoterError),
}

impl FirstPromoterClient {
    /// Create a client over the real HTTP transport.
    ///
    /// # Panics
    ///
    /// Panics if the configured credentials contain invalid header
    /// characters (see [`HttpTransport::new`]).
    #[must_use]
    pub fn new(config: FirstPromoterConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(&config));
        Self::with_transport(config, transport, RateLimiter::default())
    }

    /// Create a client over an injected transport and rate limiter.
    ///
    /// This is the test seam: integration tests pass a scripted transport
    /// and a fresh limiter so nothing leaks between cases.
    #[must_use]
    pub fn with_transport(
        config: FirstPromoterConfig,
        transport: Arc<dyn Transport>,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                limiter,
            }),
        }
    }

    /// Execute one logical API call to completion.
    ///
    /// Applies the credential gate, rate-limit admission before every
    /// attempt, and up to three retries for transport failures, 429, and
    /// 500-504 statuses. All other non-2xx statuses are terminal on first
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns a [`FirstPromoterError`] describing the terminal failure;
    /// see the error type for the full taxonomy.
    #[instrument(skip(self, spec), fields(method = %spec.method, endpoint = %spec.endpoint))]
    pub async fn execute(&self, spec: RequestSpec) -> Result<Value, FirstPromoterError> {
        if let Some(var) = self.inner.config.missing_credential() {
            return Err(FirstPromoterError::Configuration(format!(
                "{var} environment variable not set"
            )));
        }

        let mut attempt: u32 = 0;
        loop {
            self.inner.limiter.admit().await;

            debug!(attempt, method = %spec.method, endpoint = %spec.endpoint, "dispatching request");
            let started = Instant::now();

            let outcome = match self.inner.transport.send(&spec).await {
                Ok(response) => evaluate_response(response),
                Err(err) => AttemptOutcome::Retry {
                    status: None,
                    body: err.message().to_string(),
                    retry_after: None,
                },
            };

            match outcome {
                AttemptOutcome::Success { value, status } => {
                    debug!(
                        status,
                        elapsed_ms = millis(started.elapsed()),
                        "request succeeded"
                    );
                    return Ok(value);
                }
                AttemptOutcome::Fatal(err) => {
                    return Err(err);
                }
                AttemptOutcome::Retry {
                    status,
                    body,
                    retry_after,
                } => {
                    if attempt >= MAX_RETRIES {
                        let err = match status {
                            Some(status) => FirstPromoterError::classify(status, &body),
                            None => FirstPromoterError::Network(body),
                        };
                        error!(attempt, status = ?status, error = %err, "retries exhausted");
                        return Err(err);
                    }

                    let delay = retry_after
                        .map_or_else(|| backoff_delay(attempt), Duration::from_secs);
                    warn!(
                        attempt,
                        status = ?status,
                        delay_ms = millis(delay),
                        "attempt failed; retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Map a raw HTTP response onto the three attempt outcomes.
///
/// A 2xx with an empty body (or status 204) is success with no content,
/// decided from the transport's reported status rather than from a JSON
/// parse failure.
fn evaluate_response(response: RawResponse) -> AttemptOutcome {
    let RawResponse {
        status,
        retry_after,
        body,
    } = response;

    if (200..300).contains(&status) {
        if status == 204 || body.trim().is_empty() {
            return AttemptOutcome::Success {
                value: Value::Null,
                status,
            };
        }
        return match serde_json::from_str(&body) {
            Ok(value) => AttemptOutcome::Success { value, status },
            Err(err) => AttemptOutcome::Fatal(FirstPromoterError::Parse(format!(
                "response body is not valid JSON: {err}"
            ))),
        };
    }

    if status == 429 || (500..=504).contains(&status) {
        return AttemptOutcome::Retry {
            status: Some(status),
            body,
            retry_after,
        };
    }

    AttemptOutcome::Fatal(FirstPromoterError::classify(status, &body))
}

/// Exponential backoff delay for a given attempt index.
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt);
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(factor))
}

/// Duration in whole milliseconds for log fields.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            retry_after: None,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_backoff_doubles_from_one_second() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_saturates_instead_of_overflowing() {
        let delay = backoff_delay(u32::MAX);
        assert_eq!(delay, Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_success_body_parsed() {
        match evaluate_response(raw(200, r#"{"id":42}"#)) {
            AttemptOutcome::Success { value, status } => {
                assert_eq!(value, json!({"id": 42}));
                assert_eq!(status, 200);
            }
            _ => panic!("expected success"),
        }
    }

    #[test]
    fn test_empty_body_is_success_with_no_content() {
        for response in [raw(200, ""), raw(200, "  \n"), raw(204, "")] {
            match evaluate_response(response) {
                AttemptOutcome::Success { value, .. } => assert_eq!(value, Value::Null),
                _ => panic!("expected success with no content"),
            }
        }
    }

    #[test]
    fn test_invalid_json_on_success_is_fatal_parse_error() {
        match evaluate_response(raw(200, "<html>oops</html>")) {
            AttemptOutcome::Fatal(FirstPromoterError::Parse(_)) => {}
            _ => panic!("expected fatal parse error"),
        }
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [429, 500, 501, 502, 503, 504] {
            assert!(
                matches!(
                    evaluate_response(raw(status, "")),
                    AttemptOutcome::Retry { .. }
                ),
                "status {status} should be retryable"
            );
        }
    }

    #[test]
    fn test_terminal_statuses_are_fatal() {
        for status in [400, 401, 403, 404, 409, 422, 505] {
            assert!(
                matches!(
                    evaluate_response(raw(status, "{}")),
                    AttemptOutcome::Fatal(_)
                ),
                "status {status} should be terminal"
            );
        }
    }

    #[test]
    fn test_retry_carries_retry_after() {
        let response = RawResponse {
            status: 429,
            retry_after: Some(7),
            body: String::new(),
        };
        match evaluate_response(response) {
            AttemptOutcome::Retry { retry_after, .. } => assert_eq!(retry_after, Some(7)),
            _ => panic!("expected retry"),
        }
    }
}
