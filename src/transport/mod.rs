//! HTTP transport for signed requests
//!
//! This module handles the wire side of the crawler:
//! - The [`Transport`] seam the client talks to
//! - A `reqwest` implementation with timeouts, compression and proxy support
//! - Error classification and the retry policy applied by the client

mod http;
mod retry;

pub use http::{build_http_client, HttpTransport};
pub use retry::RetryPolicy;

use crate::request::SignedRequest;
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while performing an HTTP round trip
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl TransportError {
    /// Returns true for faults that may succeed on a later attempt
    ///
    /// | Condition | Retryable |
    /// |-----------|-----------|
    /// | Timeout | yes |
    /// | Connection refused | yes |
    /// | HTTP 5xx | yes |
    /// | Other HTTP status | no |
    /// | Other request errors | no |
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connect { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Request { .. } | Self::Client(_) => false,
        }
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs HTTP round trips on behalf of the client
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a signed API request
    ///
    /// Server errors (5xx) are reported as [`TransportError::Status`]; other
    /// statuses come back as a [`RawResponse`] so the caller can read the
    /// platform's JSON envelope.
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse, TransportError>;

    /// Fetches a web page without signing
    async fn get_page(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> Result<RawResponse, TransportError>;
}
