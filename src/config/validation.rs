use crate::config::pattern::compile_patterns;
use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Schemes a start page may use
const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_start_pages(&config.start_pages)?;
    compile_patterns(&config.ignored_urls)?;
    compile_patterns(&config.ignored_words)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth and timeout_seconds are unsigned, so no lower bound check needed

    if config.parallelism < 1 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be >= 1, got {}",
            config.parallelism
        )));
    }

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

/// Validates the start pages; an empty list is allowed
fn validate_start_pages(pages: &[String]) -> Result<(), ConfigError> {
    for page in pages {
        let url = Url::parse(page)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start page '{}': {}", page, e)))?;

        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(ConfigError::Validation(format!(
                "Start page '{}' must use one of: {}",
                page,
                SUPPORTED_SCHEMES.join(", ")
            )));
        }
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
