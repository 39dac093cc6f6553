use crate::config::types::{Config, IdentityConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use xhs_crawler::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max pages: {}", config.paging.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs against different configurations can be told apart.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Returns the raw cookie string, reading the environment if configured so
pub fn resolve_cookies(identity: &IdentityConfig) -> Result<String, ConfigError> {
    if let Some(cookies) = &identity.cookies {
        return Ok(cookies.clone());
    }

    match &identity.cookies_env {
        Some(var) => std::env::var(var).map_err(|_| ConfigError::MissingEnv(var.clone())),
        None => Err(ConfigError::Validation(
            "identity needs either 'cookies' or 'cookies-env'".to_string(),
        )),
    }
}
