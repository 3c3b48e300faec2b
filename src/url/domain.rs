use crate::url::matches_wildcard;
use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitecrawl::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// The set of hosts a crawl is allowed to follow links into
///
/// By default only the seed's exact host is in scope; ports are ignored.
/// With subdomains enabled, `blog.example.com` is in scope for a seed on
/// `example.com`, but not the other way round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    host: String,
    include_subdomains: bool,
}

impl DomainScope {
    /// Builds the scope from the seed URL
    ///
    /// Returns `None` when the seed has no host.
    pub fn from_seed(seed: &Url, include_subdomains: bool) -> Option<Self> {
        let host = extract_domain(seed)?;
        Some(Self {
            host,
            include_subdomains,
        })
    }

    /// The seed host this scope was built from
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if links to `url` should be followed
    pub fn contains(&self, url: &Url) -> bool {
        let Some(candidate) = extract_domain(url) else {
            return false;
        };

        if self.include_subdomains {
            matches_wildcard(&format!("*.{}", self.host), &candidate)
        } else {
            matches_wildcard(&self.host, &candidate)
        }
    }
}
