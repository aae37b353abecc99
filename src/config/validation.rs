use crate::config::types::{
    Config, CrawlerConfig, IndexConfig, RankConfig, SearchConfig, UserAgentConfig,
};
use crate::crawler::MAX_CONCURRENT_FETCHES;
use crate::url::normalize_url;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_index_config(&config.index)?;
    validate_rank_config(&config.rank)?;
    validate_search_config(&config.search)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let fetches = config.max_concurrent_fetches as usize;
    if !(1..=MAX_CONCURRENT_FETCHES).contains(&fetches) {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_ms must be >= 100ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    for seed in &config.seeds {
        normalize_url(seed).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e))
        })?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
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

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

fn validate_index_config(config: &IndexConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates rank parameters
fn validate_rank_config(config: &RankConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.damping) {
        return Err(ConfigError::Validation(format!(
            "damping must be between 0 and 1, got {}",
            config.damping
        )));
    }

    if !config.base.is_finite() || config.base < 0.0 {
        return Err(ConfigError::Validation(format!(
            "base must be a non-negative number, got {}",
            config.base
        )));
    }

    Ok(())
}

/// Validates search settings
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.result_limit < 1 {
        return Err(ConfigError::Validation(
            "result_limit must be >= 1".to_string(),
        ));
    }

    if config.weights.is_empty() {
        return Err(ConfigError::Validation(
            "at least one signal weight must be configured".to_string(),
        ));
    }

    for (signal, weight) in &config.weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(ConfigError::Validation(format!(
                "weight for signal '{}' must be a non-negative number, got {}",
                signal, weight
            )));
        }
    }

    Ok(())
}
