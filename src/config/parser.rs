use crate::config::types::{ConfigFile, CrawlOptions};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and validates crawl options from a TOML file
///
/// The file holds a single `[crawl]` table; every key is optional and falls
/// back to the defaults of [`CrawlOptions`].
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitecrawl::config::load_options;
///
/// let options = load_options(Path::new("sitecrawl.toml")).unwrap();
/// println!("Timeout: {:?}", options.fetch_timeout());
/// ```
pub fn load_options(path: &Path) -> Result<CrawlOptions, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_options(&content)
}

/// Parses and validates crawl options from TOML text
pub fn parse_options(content: &str) -> Result<CrawlOptions, ConfigError> {
    let file: ConfigFile = toml::from_str(content)?;

    validate(&file.crawl)?;

    Ok(file.crawl)
}
