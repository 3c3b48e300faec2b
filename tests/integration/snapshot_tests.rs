//! Integration tests for snapshot replay

use sitecrawl::output::{load_snapshot, save_snapshot};
use sitecrawl::{crawl, CrawlError, CrawlOptions};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_snapshot_round_trip_without_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/about">About</a>"#.as_bytes().to_vec(), "text/html"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<p>about</p>".to_vec(), "text/html"),
        )
        .mount(&mock_server)
        .await;

    let live = crawl(&mock_server.uri(), CrawlOptions::default().with_body(true))
        .await
        .unwrap();
    assert_eq!(live.pages.len(), 2);

    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("site.json");
    save_snapshot(&snapshot_path, &live.pages).await.unwrap();

    let requests_before = mock_server.received_requests().await.unwrap().len();
    let replay = crawl(snapshot_path.to_str().unwrap(), CrawlOptions::default())
        .await
        .unwrap();

    assert_eq!(replay.pages, live.pages);
    assert!(replay.failures.is_empty());
    assert_eq!(
        mock_server.received_requests().await.unwrap().len(),
        requests_before
    );
}

#[tokio::test]
async fn test_snapshot_file_url() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"url": "https://example.com/", "checksum": "{}", "links": ["https://example.com/a"], "date": "2024-05-06T07:08:09Z"}}]"#,
        "ab".repeat(32)
    )
    .unwrap();

    let file_url = url::Url::from_file_path(file.path()).unwrap();
    let outcome = crawl(file_url.as_str(), CrawlOptions::default()).await.unwrap();

    assert_eq!(outcome.pages.len(), 1);
    let page = &outcome.pages.pages()[0];
    assert_eq!(page.url, "https://example.com/");
    assert_eq!(page.links, vec!["https://example.com/a"]);
    assert!(page.body.is_none());
    assert!(page.headers.is_none());
}

#[tokio::test]
async fn test_snapshot_missing() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");

    let result = crawl(missing.to_str().unwrap(), CrawlOptions::default()).await;

    assert!(matches!(result, Err(CrawlError::SnapshotRead { .. })));
}

#[tokio::test]
async fn test_snapshot_malformed() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{\"not\": \"an array\"}").unwrap();

    let result = load_snapshot(file.path()).await;

    assert!(matches!(result, Err(CrawlError::SnapshotParse { .. })));
}
