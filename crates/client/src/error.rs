//! Error classification for FirstPromoter API failures.
//!
//! Every terminal failure surfaces as exactly one [`FirstPromoterError`]
//! carrying a human-actionable message, the upstream status code where one
//! exists, and a short excerpt of the upstream's own error text. Raw bodies
//! and transport stack traces never cross this boundary.

use thiserror::Error;

/// Maximum length of a detail excerpt taken from an error body.
const MAX_DETAIL_LEN: usize = 200;

/// Classified error returned by the request executor.
#[derive(Debug, Error)]
pub enum FirstPromoterError {
    /// Required credentials are missing; no network call was made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The API rejected the bearer token (401).
    #[error("unauthorized: check that FP_API_KEY holds a valid FirstPromoter API key")]
    Unauthorized,

    /// The credentials lack access to the resource (403).
    #[error("access denied: {detail}")]
    Forbidden {
        /// Upstream error text.
        detail: String,
    },

    /// The resource does not exist (404).
    #[error("not found: {detail}")]
    NotFound {
        /// Upstream error text.
        detail: String,
    },

    /// The API rejected the request payload (422).
    #[error("validation error: {detail}")]
    Validation {
        /// Upstream error text.
        detail: String,
    },

    /// Rate limited by the API (429) and the retry budget is spent.
    #[error("rate limited by the FirstPromoter API; retries exhausted")]
    RateLimited,

    /// The API failed server-side (500-504) on every attempt.
    #[error("server error ({status}): {detail}")]
    Server {
        /// Upstream status code.
        status: u16,
        /// Upstream error text.
        detail: String,
    },

    /// The transport failed before any response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response carried a body that is not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// Any other non-success status.
    #[error("API error ({status}): {detail}")]
    Unclassified {
        /// Upstream status code.
        status: u16,
        /// Upstream error text.
        detail: String,
    },
}

impl FirstPromoterError {
    /// Classify a failing HTTP response into an error kind.
    ///
    /// The detail excerpt is extracted from the body per
    /// [`extract_detail`]; 401 and 429 carry fixed messages instead.
    #[must_use]
    pub fn classify(status: u16, body: &str) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden {
                detail: extract_detail(body),
            },
            404 => Self::NotFound {
                detail: extract_detail(body),
            },
            422 => Self::Validation {
                detail: extract_detail(body),
            },
            429 => Self::RateLimited,
            500..=504 => Self::Server {
                status,
                detail: extract_detail(body),
            },
            _ => Self::Unclassified {
                status,
                detail: extract_detail(body),
            },
        }
    }

    /// Upstream HTTP status associated with this error, if any.
    ///
    /// `Configuration`, `Network`, and `Parse` errors have no status: they
    /// occur before a response exists or after a successful one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Validation { .. } => Some(422),
            Self::RateLimited => Some(429),
            Self::Server { status, .. } | Self::Unclassified { status, .. } => Some(*status),
            Self::Configuration(_) | Self::Network(_) | Self::Parse(_) => None,
        }
    }

    /// Detail excerpt taken from the upstream error body, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Forbidden { detail }
            | Self::NotFound { detail }
            | Self::Validation { detail }
            | Self::Server { detail, .. }
            | Self::Unclassified { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

/// Extract a short human-readable detail from a raw error body.
///
/// Recognized JSON shapes, in order: a string `error` field, a string
/// `message` field, an array `errors` field joined with `"; "`. Anything
/// else falls back to a compact rendering truncated to 200 characters;
/// non-JSON bodies are truncated raw text.
#[must_use]
pub fn extract_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return truncate(body.trim());
    };

    if let Some(msg) = value.get("error").and_then(serde_json::Value::as_str) {
        return truncate(msg);
    }
    if let Some(msg) = value.get("message").and_then(serde_json::Value::as_str) {
        return truncate(msg);
    }
    if let Some(errors) = value.get("errors").and_then(serde_json::Value::as_array) {
        let joined = errors
            .iter()
            .map(|e| match e {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ");
        return truncate(&joined);
    }

    truncate(&value.to_string())
}

/// Truncate a detail string to [`MAX_DETAIL_LEN`] characters.
fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_LEN {
        text.to_string()
    } else {
        text.chars().take(MAX_DETAIL_LEN).collect()
    }
}
