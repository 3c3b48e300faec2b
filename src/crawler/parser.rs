//! HTML link extraction
//!
//! The crawl engine only sees the [`LinkExtractor`] trait.
//! [`HtmlLinkExtractor`] parses HTML with scraper and returns absolute links.

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// A body that could not be parsed for links
///
/// The page is still recorded, with an empty link list.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Finds the absolute URLs linked from a page body
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, body: &[u8], base_url: &Url) -> Result<Vec<Url>, ExtractionError>;
}

/// Link extractor for HTML documents
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that does not resolve to http(s)
///
/// A `<base href>` element, when present, replaces the page URL as the base
/// for relative links.
///
/// Bodies are decoded leniently: bytes that are not UTF-8 (Latin-1 and
/// windows-1252 pages, stray binary) become U+FFFD, and the ASCII markup
/// around them still yields its links.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, body: &[u8], base_url: &Url) -> Result<Vec<Url>, ExtractionError> {
        let html = String::from_utf8_lossy(body);
        parse_html(&html, base_url)
    }
}

/// Parses HTML content and extracts absolute links in document order
///
/// # Example
///
/// ```
/// use sitecrawl::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = parse_html(html, &base_url).unwrap();
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> Result<Vec<Url>, ExtractionError> {
    let document = Html::parse_document(html);

    let base_url = document_base(&document, base_url)?;

    extract_links(&document, &base_url)
}

fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector(format!("{}: {:?}", css, e)))
}

/// Resolves the effective base URL, honoring `<base href>`
fn document_base(document: &Html, page_url: &Url) -> Result<Url, ExtractionError> {
    let base_selector = selector("base[href]")?;

    let base = document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone());

    Ok(base)
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Result<Vec<Url>, ExtractionError> {
    let mut links = Vec::new();

    let a_selector = selector("a[href]")?;
    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(absolute_url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            links.push(absolute_url);
        }
    }

    let canonical_selector = selector("link[rel='canonical'][href]")?;
    for element in document.select(&canonical_selector) {
        if let Some(absolute_url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            links.push(absolute_url);
        }
    }

    Ok(links)
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}
