//! xhs-crawler: a signed-request crawling client for Xiaohongshu
//!
//! This crate signs every outbound API request through an injected signing
//! oracle, walks the platform's cursor-based pagination to collect bounded
//! result sets, and assembles two-level comment trees from dependent calls.

pub mod client;
pub mod comments;
pub mod config;
pub mod identity;
pub mod paging;
pub mod request;
pub mod signing;
pub mod transport;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum XhsError {
    #[error("Transport failure: {0}")]
    Transport(#[from] transport::TransportError),

    #[error("Malformed response from {path}: {message}")]
    MalformedResponse { path: String, message: String },

    #[error("Request to {path} rejected by remote (code {code:?}): {message}")]
    RemoteRejected {
        path: String,
        code: Option<i64>,
        message: String,
    },

    #[error("Signing failure: {0}")]
    Signing(#[from] signing::SigningError),

    #[error("Malformed identity: {0}")]
    Identity(#[from] identity::IdentityError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pagination did not finish within {max_pages} pages")]
    PageLimitExceeded { max_pages: u32 },

    #[error("Operation cancelled")]
    Cancelled,
}

/// Closed classification of [`XhsError`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TransportFailure,
    MalformedResponse,
    RemoteRejected,
    SigningFailure,
    MalformedIdentity,
    InvalidUrl,
    InvalidConfig,
    PageLimitExceeded,
    Cancelled,
}

impl XhsError {
    /// Returns the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            Self::Signing(_) => ErrorKind::SigningFailure,
            Self::Identity(_) => ErrorKind::MalformedIdentity,
            Self::Url(_) => ErrorKind::InvalidUrl,
            Self::Config(_) => ErrorKind::InvalidConfig,
            Self::PageLimitExceeded { .. } => ErrorKind::PageLimitExceeded,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn malformed(path: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no resource id in its path: {0}")]
    MissingResourceId(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, XhsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use client::XhsClient;
pub use comments::{CommentNode, CommentTreeAssembler};
pub use config::Config;
pub use identity::Identity;
pub use paging::{Collector, Limit, PageResult, PageShape, PagingPolicy};
pub use signing::{RandomSource, Signature, SigningOracle};
pub use crate::url::{extract_tokens, UrlTokens};
