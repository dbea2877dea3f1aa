//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required for API access
//! - `FP_API_KEY` - FirstPromoter API bearer token
//! - `FP_ACCOUNT_ID` - FirstPromoter account identifier
//!
//! ## Optional
//! - `FP_BASE_URL` - API base URL (default: production company API)
//! - `RUST_LOG` - log verbosity, consumed by binaries (default: info)
//!
//! Missing credentials do not fail loading: the executor rejects calls with
//! a configuration error before any network activity, which lets a process
//! start (and log a warning) with credentials arriving later via a restart.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Production FirstPromoter company API.
pub const DEFAULT_BASE_URL: &str = "https://api.firstpromoter.com/api/v2/company";

/// FirstPromoter API credentials and endpoint.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FirstPromoterConfig {
    /// Bearer token for the `Authorization` header.
    pub api_key: SecretString,
    /// Account identifier for the `Account-ID` header.
    pub account_id: String,
    /// Base URL all endpoint paths are resolved against.
    pub base_url: String,
}

impl fmt::Debug for FirstPromoterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirstPromoterConfig")
            .field("api_key", &"[REDACTED]")
            .field("account_id", &self.account_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FirstPromoterConfig {
    /// Create a config with explicit credentials and the default base URL.
    #[must_use]
    pub fn new(api_key: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            account_id: account_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// Unset variables load as empty values; see the module docs for why
    /// this does not fail immediately.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var("FP_API_KEY").unwrap_or_default();
        let account_id = std::env::var("FP_ACCOUNT_ID").unwrap_or_default();
        let base_url =
            std::env::var("FP_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            api_key: SecretString::from(api_key),
            account_id,
            base_url,
        }
    }

    /// Override the base URL (staging, sandboxes).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Name of the first missing credential variable, if any.
    ///
    /// The executor calls this before every request; binaries use it for a
    /// startup warning.
    #[must_use]
    pub fn missing_credential(&self) -> Option<&'static str> {
        if self.api_key.expose_secret().is_empty() {
            return Some("FP_API_KEY");
        }
        if self.account_id.is_empty() {
            return Some("FP_ACCOUNT_ID");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_reports_api_key_first() {
        let config = FirstPromoterConfig::new("", "");
        assert_eq!(config.missing_credential(), Some("FP_API_KEY"));

        let config = FirstPromoterConfig::new("key", "");
        assert_eq!(config.missing_credential(), Some("FP_ACCOUNT_ID"));

        let config = FirstPromoterConfig::new("key", "acct");
        assert_eq!(config.missing_credential(), None);
    }

    #[test]
    fn test_default_base_url() {
        let config = FirstPromoterConfig::new("key", "acct");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_with_base_url_override() {
        let config =
            FirstPromoterConfig::new("key", "acct").with_base_url("http://localhost:9999");
        assert_eq!(config.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = FirstPromoterConfig::new("super-secret", "acct");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret"));
    }
}
