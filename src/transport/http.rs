//! `reqwest`-backed transport
//!
//! This module handles all HTTP traffic for the crawler, including:
//! - Building the HTTP client with timeouts, compression and an optional proxy
//! - Sending signed API requests with the session cookies attached
//! - Fetching plain web pages
//! - Error classification

use crate::config::ClientConfig;
use crate::request::SignedRequest;
use crate::transport::{RawResponse, Transport, TransportError};
use async_trait::async_trait;
use reqwest::{header::COOKIE, Client, Proxy};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Builds an HTTP client from the client configuration
///
/// # Arguments
///
/// * `config` - The client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Invalid proxy or TLS setup
///
/// # Example
///
/// ```no_run
/// use xhs_crawler::config::ClientConfig;
/// use xhs_crawler::transport::build_http_client;
///
/// let client = build_http_client(&ClientConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

/// Transport sending requests to a fixed API host
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    api_base_url: String,
}

impl HttpTransport {
    /// Creates a transport from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client =
            build_http_client(config).map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    /// Creates a transport around an existing client
    pub fn with_client(client: Client, api_base_url: &str) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the API base URL requests are sent to
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.api_base_url, request.path);
        debug!(method = %request.method, url = %url, "Sending signed request");

        let mut builder = self.client.request(request.method.clone(), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = builder.header(COOKIE, request.cookies.cookie_header());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| classify(&url, e))?;
        let status = response.status();

        if status.is_server_error() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| classify(&url, e))?;
        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_page(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> Result<RawResponse, TransportError> {
        debug!(url = %url, "Fetching page");

        let mut builder = self.client.get(url);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| classify(url, e))?;
        let status = response.status();

        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| classify(url, e))?;
        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Maps a `reqwest` error onto the transport error taxonomy
fn classify(url: &str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        TransportError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else if let Some(status) = error.status() {
        TransportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
