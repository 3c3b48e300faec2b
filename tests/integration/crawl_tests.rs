//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use sitecrawl::crawler::{checksum, FetchError};
use sitecrawl::{crawl, Coordinator, CrawlError, CrawlOptions};
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html.as_bytes().to_vec(), "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn urls(outcome: &sitecrawl::CrawlOutcome) -> HashSet<String> {
    outcome.pages.iter().map(|page| page.url.clone()).collect()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2#section">Page 2</a>
            <a href="https://elsewhere.invalid/">Elsewhere</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body>Content 1 <a href="/">Home</a> <a href="page2">Next</a></body></html>"#,
    )
    .await;
    mount_page(&mock_server, "/page2", "<html><body>Content 2</body></html>").await;

    let outcome = crawl(&format!("{}/", base_url), CrawlOptions::default())
        .await
        .expect("Crawl failed");

    let expected: HashSet<String> = ["/", "/page1", "/page2"]
        .iter()
        .map(|route| format!("{}{}", base_url, route))
        .collect();
    assert_eq!(urls(&outcome), expected);
    assert!(outcome.failures.is_empty());

    let home = outcome.pages.get(&format!("{}/", base_url)).expect("Home page missing");
    assert_eq!(
        home.links,
        vec![
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
            "https://elsewhere.invalid/".to_string(),
        ]
    );

    let page2 = outcome.pages.get(&format!("{}/page2", base_url)).unwrap();
    assert_eq!(page2.checksum, checksum(b"<html><body>Content 2</body></html>"));
    assert!(page2.links.is_empty());

    // Each page is requested exactly once
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_body_and_headers_recorded() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>hello</p>").await;

    let options = CrawlOptions::default().with_body(true).with_headers(true);
    let outcome = crawl(&mock_server.uri(), options).await.unwrap();

    let page = &outcome.pages.pages()[0];
    assert_eq!(page.body.as_deref(), Some("<p>hello</p>"));
    let headers = page.headers.as_ref().expect("Headers missing");
    assert_eq!(headers["content-type"], "text/html; charset=utf-8");
}

#[tokio::test]
async fn test_non_success_status_is_a_failure() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/gone">Gone</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let outcome = crawl(&mock_server.uri(), CrawlOptions::default()).await.unwrap();

    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].url, format!("{}/gone", mock_server.uri()));
    assert_eq!(outcome.failures[0].error, FetchError::Status(404));
}

#[tokio::test]
async fn test_redirect_followed_and_links_resolved_against_target() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/index.html"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/docs/index.html", r#"<a href="guide.html">Guide</a>"#).await;
    mount_page(&mock_server, "/docs/guide.html", "<p>guide</p>").await;

    let outcome = crawl(&mock_server.uri(), CrawlOptions::default()).await.unwrap();

    let root = outcome.pages.get(&format!("{}/", mock_server.uri())).unwrap();
    assert_eq!(root.links, vec![format!("{}/docs/guide.html", mock_server.uri())]);
    assert!(outcome
        .pages
        .contains_url(&format!("{}/docs/guide.html", mock_server.uri())));
}

#[tokio::test]
async fn test_directory_redirect_keeps_relative_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/docs/", r#"<a href="intro">Intro</a> <a href="./">Index</a>"#).await;
    mount_page(&mock_server, "/docs/intro", "<p>intro</p>").await;

    let outcome = crawl(&format!("{}/docs/", base_url), CrawlOptions::default())
        .await
        .unwrap();

    let docs = outcome.pages.get(&format!("{}/docs", base_url)).expect("Docs page missing");
    assert_eq!(
        docs.links,
        vec![format!("{}/docs/intro", base_url), format!("{}/docs", base_url)]
    );
    assert!(outcome.pages.contains_url(&format!("{}/docs/intro", base_url)));
    assert_eq!(outcome.pages.len(), 2);
    assert!(outcome.failures.is_empty());
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let options = CrawlOptions::default().with_fetch_timeout(Duration::from_millis(300));
    let outcome = crawl(&mock_server.uri(), options).await.unwrap();

    assert!(outcome.pages.is_empty());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].error, FetchError::Timeout);
}

#[tokio::test]
async fn test_unreachable_seed() {
    // Reserve a port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let seed = format!("http://127.0.0.1:{}/", port);
    let outcome = crawl(&seed, CrawlOptions::default()).await.unwrap();

    assert!(outcome.pages.is_empty());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].url, seed);
}

#[tokio::test]
async fn test_max_pages_limits_requests() {
    let mock_server = MockServer::start().await;
    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 0..10 {
        mount_page(&mock_server, &format!("/p{}", i), "<p>leaf</p>").await;
    }

    let options = CrawlOptions::default().with_max_pages(Some(3));
    let outcome = crawl(&mock_server.uri(), options).await.unwrap();

    assert_eq!(outcome.pages.len() + outcome.failures.len(), 3);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_invalid_seed() {
    let result = crawl("ftp://example.com/file", CrawlOptions::default()).await;
    assert!(matches!(result, Err(CrawlError::InvalidSeed(_))));
}

#[tokio::test]
async fn test_invalid_options() {
    let result = Coordinator::new(CrawlOptions::default().with_concurrency(0));
    assert!(matches!(result, Err(CrawlError::Config(_))));
}
