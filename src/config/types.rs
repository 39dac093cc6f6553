use serde::Deserialize;

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    pub identity: IdentityConfig,
    pub signer: SignerConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the signed API host
    #[serde(rename = "api-base-url", default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the public web client
    #[serde(rename = "web-base-url", default = "default_web_base_url")]
    pub web_base_url: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Optional proxy URL applied to all requests
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            web_base_url: default_web_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            proxy: None,
        }
    }
}

/// Where the session cookies come from
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Raw cookie string copied from a logged-in browser
    #[serde(default)]
    pub cookies: Option<String>,

    /// Name of an environment variable holding the cookie string
    #[serde(rename = "cookies-env", default)]
    pub cookies_env: Option<String>,
}

/// External signing helper
#[derive(Debug, Clone, Deserialize)]
pub struct SignerConfig {
    /// Program to run
    pub command: String,

    /// Arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,

    /// Maximum time a single signing call may take (seconds)
    #[serde(rename = "timeout-secs", default = "default_signer_timeout_secs")]
    pub timeout_secs: u64,
}

/// Pagination behavior
#[derive(Debug, Clone, Deserialize)]
pub struct PagingConfig {
    /// Maximum pages a single collection may fetch
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Number of comment reply expansions run at once
    #[serde(rename = "reply-concurrency", default = "default_reply_concurrency")]
    pub reply_concurrency: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            reply_concurrency: default_reply_concurrency(),
        }
    }
}

/// Retry behavior for transient transport faults
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, first one included
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "base-delay-ms", default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound for any retry delay (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://edith.xiaohongshu.com".to_string()
}

fn default_web_base_url() -> String {
    "https://www.xiaohongshu.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_signer_timeout_secs() -> u64 {
    10
}

fn default_max_pages() -> u32 {
    1000
}

fn default_reply_concurrency() -> usize {
    1
}

fn default_max_attempts() -> u32 {
    1
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    8000
}
