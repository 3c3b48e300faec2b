use crate::config::types::CrawlOptions;
use crate::ConfigError;

/// Upper bound on concurrent workers
const MAX_CONCURRENCY: usize = 100;

/// Validates crawl options
pub fn validate(options: &CrawlOptions) -> Result<(), ConfigError> {
    if options.concurrency < 1 || options.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, options.concurrency
        )));
    }

    if options.fetch_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "fetch timeout must be greater than zero".to_string(),
        ));
    }

    if options.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if options.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
