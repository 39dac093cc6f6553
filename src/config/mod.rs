//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use xhs_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("API host: {}", config.client.api_base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ClientConfig, Config, IdentityConfig, PagingConfig, RetryConfig, SignerConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, resolve_cookies};
