//! FirstPromoter API client with an outbound reliability layer.
//!
//! This crate wraps the FirstPromoter affiliate-management REST API
//! (`https://api.firstpromoter.com/api/v2/company`) behind a single
//! operation: [`FirstPromoterClient::execute`]. The caller describes a
//! request; the client owns everything between that description and a
//! parsed JSON value or a classified error:
//!
//! - **Rate limiting** - a sliding 60-second window capped below the
//!   upstream 400/minute limit ([`rate_limit`]).
//! - **Retry with backoff** - up to three retries for transport failures,
//!   429, and 500-504, with `Retry-After` honored ([`client`]).
//! - **Error classification** - every terminal failure becomes one
//!   [`FirstPromoterError`] with a short upstream detail excerpt
//!   ([`error`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use firstpromoter_client::{FirstPromoterClient, FirstPromoterConfig, RequestSpec};
//!
//! let client = FirstPromoterClient::new(FirstPromoterConfig::from_env());
//!
//! let promoters = client
//!     .execute(RequestSpec::get("promoters").with_query("page", "1"))
//!     .await?;
//! ```
//!
//! # Testing
//!
//! The HTTP layer sits behind the [`Transport`] trait;
//! [`FirstPromoterClient::with_transport`] accepts any implementation plus
//! a fresh [`RateLimiter`], so tests run against scripted responses with no
//! network and no shared state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod request;
pub mod transport;

pub use client::FirstPromoterClient;
pub use config::FirstPromoterConfig;
pub use error::FirstPromoterError;
pub use rate_limit::RateLimiter;
pub use request::{Method, RequestSpec};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
