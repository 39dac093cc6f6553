//! Platform API client
//!
//! [`XhsClient`] owns the identity, the request builder and the transport.
//! Every endpoint goes through the same path:
//! 1. Build and sign the request (re-signed on every attempt)
//! 2. Send it, retrying transient faults per the [`RetryPolicy`]
//! 3. Unwrap the `{success, msg, code, data}` envelope into `data`
//!
//! Endpoints are grouped by resource in the submodules; paginated
//! aggregates drive the shared [`Collector`].

mod comments;
mod messages;
mod notes;
mod search;
mod users;

pub use search::{
    FilterNoteRange, FilterNoteTime, FilterNoteType, FilterPosDistance, GeoPoint, SearchFilters,
    SortType,
};

use crate::config::{resolve_cookies, Config};
use crate::identity::Identity;
use crate::paging::{Collector, PagingPolicy};
use crate::request::{splice_query, RequestBuilder};
use crate::signing::{CommandOracle, RandomSource, SigningOracle, ThreadRandom};
use crate::transport::{HttpTransport, RawResponse, RetryPolicy, Transport, TransportError};
use crate::url::WEB_BASE_URL;
use crate::{Result, XhsError};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Image formats the web client advertises on every listing call
pub(crate) const IMAGE_FORMATS: [&str; 3] = ["jpg", "webp", "avif"];

/// [`IMAGE_FORMATS`] as a query value
pub(crate) const IMAGE_FORMATS_QUERY: &str = "jpg,webp,avif";

/// Response envelope shared by all API endpoints
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    data: Value,
}

/// Signed-request client for the platform's web API
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use xhs_crawler::config::load_config;
/// use xhs_crawler::{Limit, XhsClient};
///
/// # async fn example() -> xhs_crawler::Result<()> {
/// let config = load_config(Path::new("config.toml"))?;
/// let client = XhsClient::from_config(&config)?;
/// let notes = client
///     .user_notes("https://www.xiaohongshu.com/user/profile/5f00", Limit::Count(30))
///     .await?;
/// println!("{} notes", notes.len());
/// # Ok(())
/// # }
/// ```
pub struct XhsClient {
    transport: Arc<dyn Transport>,
    builder: RequestBuilder,
    identity: Identity,
    retry: RetryPolicy,
    collector: Collector,
    reply_concurrency: usize,
    web_base_url: String,
}

impl XhsClient {
    /// Creates a client with default retry and paging policies
    ///
    /// Fails with a malformed-identity error when the cookies lack the
    /// signer's token.
    pub fn new(
        identity: Identity,
        oracle: Arc<dyn SigningOracle>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        identity.token()?;

        Ok(Self {
            transport,
            builder: RequestBuilder::new(oracle, Arc::new(ThreadRandom)),
            identity,
            retry: RetryPolicy::default(),
            collector: Collector::default(),
            reply_concurrency: 1,
            web_base_url: WEB_BASE_URL.to_string(),
        })
    }

    /// Creates a client from a loaded configuration
    ///
    /// Wires the external signing helper, the `reqwest` transport and the
    /// configured retry and paging policies.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cookies = resolve_cookies(&config.identity)?;
        let identity = Identity::parse(&cookies)?;

        let oracle = CommandOracle::new(
            config.signer.command.clone(),
            config.signer.args.clone(),
            Duration::from_secs(config.signer.timeout_secs),
        );
        let transport = HttpTransport::new(&config.client)?;

        let retry = RetryPolicy::new(
            config.retry.max_attempts,
            Duration::from_millis(config.retry.base_delay_ms),
            Duration::from_millis(config.retry.max_delay_ms),
        );

        Ok(Self::new(identity, Arc::new(oracle), Arc::new(transport))?
            .with_retry(retry)
            .with_paging(PagingPolicy {
                max_pages: config.paging.max_pages,
            })
            .with_reply_concurrency(config.paging.reply_concurrency)
            .with_web_base_url(&config.client.web_base_url))
    }

    /// Replaces the random source used for trace and search ids
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.builder = self.builder.with_random(random);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_paging(mut self, policy: PagingPolicy) -> Self {
        self.collector = Collector::new(policy, self.collector.cancel_token().clone());
        self
    }

    /// Binds the client to a cancellation token checked on every page fetch
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.collector = Collector::new(self.collector.policy(), cancel);
        self
    }

    /// Sets how many comments are expanded at once when assembling trees
    pub fn with_reply_concurrency(mut self, concurrency: usize) -> Self {
        self.reply_concurrency = concurrency.max(1);
        self
    }

    /// Sets the web host used for page lookups
    pub fn with_web_base_url(mut self, web_base_url: &str) -> Self {
        self.web_base_url = web_base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        self.collector.cancel_token()
    }

    pub(crate) fn collector(&self) -> &Collector {
        &self.collector
    }

    pub(crate) fn random(&self) -> &dyn RandomSource {
        self.builder.random()
    }

    /// Signed GET with raw query parameters spliced onto the path
    pub(crate) async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let path = splice_query(path, params);
        self.call(Method::GET, &path, None).await
    }

    /// Signed POST with a JSON body
    pub(crate) async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.call(Method::POST, path, Some(body)).await
    }

    /// Unsigned GET of a web page, returning its HTML
    pub(crate) async fn get_page(&self, url: &str) -> Result<String> {
        let response = self
            .transport
            .get_page(url, &crate::request::page_headers())
            .await?;
        Ok(response.body)
    }

    async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let mut attempt = 0;

        let response = loop {
            attempt += 1;
            let request = self
                .builder
                .build(method.clone(), path, body, &self.identity)
                .await?;

            match self.transport.send(&request).await {
                Ok(response) => break response,
                Err(e) if e.is_retryable() && self.retry.allows_retry(attempt) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::select! {
                        _ = self.cancel_token().cancelled() => return Err(XhsError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => return Err(e.into()),
            }
        };

        debug!(path, status = response.status, attempt, "Received response");
        unwrap_envelope(path, response)
    }
}

impl std::fmt::Debug for XhsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XhsClient")
            .field("cookies", &self.identity.iter().count())
            .field("retry", &self.retry)
            .field("collector", &self.collector)
            .field("reply_concurrency", &self.reply_concurrency)
            .field("web_base_url", &self.web_base_url)
            .finish_non_exhaustive()
    }
}

/// Decodes the response envelope and returns its `data`
///
/// | Body | Result |
/// |------|--------|
/// | Not JSON, non-2xx status | Transport failure (the status) |
/// | Not JSON, 2xx status | Malformed response |
/// | JSON without `success` | Malformed response |
/// | `success: false` | Remote rejection carrying `msg` and `code` |
/// | `success: true` | `data`, or `null` when absent |
fn unwrap_envelope(path: &str, response: RawResponse) -> Result<Value> {
    let value: Value = match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(_) if !response.is_success() => {
            return Err(TransportError::Status {
                url: path.to_string(),
                status: response.status,
            }
            .into());
        }
        Err(e) => return Err(XhsError::malformed(path, format!("invalid JSON: {}", e))),
    };

    let envelope: Envelope = serde_json::from_value(value)
        .map_err(|e| XhsError::malformed(path, format!("invalid envelope: {}", e)))?;

    if !envelope.success {
        return Err(XhsError::RemoteRejected {
            path: path.to_string(),
            code: envelope.code,
            message: envelope.msg.unwrap_or_else(|| "request rejected".to_string()),
        });
    }

    Ok(envelope.data)
}
