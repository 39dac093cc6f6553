use crate::config::types::{
    ClientConfig, Config, IdentityConfig, PagingConfig, RetryConfig, SignerConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_client_config(&config.client)?;
    validate_identity_config(&config.identity)?;
    validate_signer_config(&config.signer)?;
    validate_paging_config(&config.paging)?;
    validate_retry_config(&config.retry)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    validate_base_url("api-base-url", &config.api_base_url)?;
    validate_base_url("web-base-url", &config.web_base_url)?;

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if let Some(proxy) = &config.proxy {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;
    }

    Ok(())
}

/// Validates that an identity source is configured
fn validate_identity_config(config: &IdentityConfig) -> Result<(), ConfigError> {
    match (&config.cookies, &config.cookies_env) {
        (Some(_), Some(_)) => Err(ConfigError::Validation(
            "set only one of 'cookies' and 'cookies-env'".to_string(),
        )),
        (None, None) => Err(ConfigError::Validation(
            "identity needs either 'cookies' or 'cookies-env'".to_string(),
        )),
        (Some(cookies), None) if cookies.trim().is_empty() => Err(ConfigError::Validation(
            "cookies cannot be empty".to_string(),
        )),
        (None, Some(var)) if var.trim().is_empty() => Err(ConfigError::Validation(
            "cookies-env cannot be empty".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Validates signer configuration
fn validate_signer_config(config: &SignerConfig) -> Result<(), ConfigError> {
    if config.command.trim().is_empty() {
        return Err(ConfigError::Validation(
            "signer command cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "signer timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates pagination configuration
fn validate_paging_config(config: &PagingConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.reply_concurrency < 1 || config.reply_concurrency > 32 {
        return Err(ConfigError::Validation(format!(
            "reply-concurrency must be between 1 and 32, got {}",
            config.reply_concurrency
        )));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.base_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "base-delay-ms ({}) cannot exceed max-delay-ms ({})",
            config.base_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

/// Validates a base URL: http(s), has a host, no query or fragment
fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} has no host: '{}'",
            field, value
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} cannot carry a query or fragment: '{}'",
            field, value
        )));
    }

    Ok(())
}
