use crate::config::types::{Config, FolioConfig, UrlParserConfig, UserAgentConfig, WebConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_folio_config(&config.folio)?;
    validate_web_config(&config.web)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_url_parser_config(&config.url_parser)?;

    if config.output.report_dir.is_empty() {
        return Err(ConfigError::Validation(
            "report_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_folio_config(config: &FolioConfig) -> Result<(), ConfigError> {
    Url::parse(&config.okapi_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid okapi_url: {}", e)))?;

    if config.tenant_id.is_empty() {
        return Err(ConfigError::Validation(
            "tenant_id cannot be empty".to_string(),
        ));
    }

    if config.query_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "query_limit must be >= 1, got {}",
            config.query_limit
        )));
    }

    if config.batch_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_limit must be >= 1, got {}",
            config.batch_limit
        )));
    }

    if config.instance_ids_path.is_empty() {
        return Err(ConfigError::Validation(
            "instance_ids_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_web_config(config: &WebConfig) -> Result<(), ConfigError> {
    validate_seconds("default_crawl_delay", config.default_crawl_delay)?;
    validate_seconds("max_crawl_delay", config.max_crawl_delay)?;
    validate_seconds("request_timeout", config.request_timeout)?;

    if config.request_timeout == 0.0 {
        return Err(ConfigError::Validation(
            "request_timeout must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Durations are read as seconds and must convert cleanly
fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Validation(format!(
            "{} must be a finite number of seconds, got {}",
            name, value
        )));
    }
    Duration::try_from_secs_f64(value).map_err(|e| {
        ConfigError::Validation(format!(
            "{} must be a non-negative number of seconds, got {} ({})",
            name, value, e
        ))
    })?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Proxy checks need a prefix to compare against
fn validate_url_parser_config(config: &UrlParserConfig) -> Result<(), ConfigError> {
    let has_prefix = config
        .proxy_prefix
        .as_deref()
        .is_some_and(|prefix| !prefix.is_empty());

    if config.report_no_proxy_prefix && !has_prefix {
        return Err(ConfigError::Validation(
            "proxy_prefix is required for report_no_proxy_prefix".to_string(),
        ));
    }

    if config.report_wrong_proxy_prefix && !has_prefix {
        return Err(ConfigError::Validation(
            "proxy_prefix is required for report_wrong_proxy_prefix".to_string(),
        ));
    }

    if config.proxy_prefix_common_part.is_empty() {
        return Err(ConfigError::Validation(
            "proxy_prefix_common_part cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
