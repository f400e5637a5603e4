//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end through the real HTTP fetcher.

use pagewave::config::Config;
use pagewave::crawler::{Coordinator, CrawlRequest};
use pagewave::output::ExportRecord;
use pagewave::storage::{SqliteStorage, Storage};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that writes into `dir`
fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.max_concurrent_pages_open = 4;
    config.fetch.timeout_secs = 5;
    config.fetch.retry_delay_secs = 0;
    config.output.database_path = dir.path().join("test.db").display().to_string();
    config.output.export_dir = dir.path().join("exports").display().to_string();
    config
}

fn create_request(seed: String, max_depth: u32) -> CrawlRequest {
    CrawlRequest {
        max_depth,
        ..CrawlRequest::new(seed)
    }
}

async fn mount_page(server: &MockServer, route: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn html(body: &str) -> String {
    format!(
        "<html><head><title>Test</title></head><body>{}</body></html>",
        body
    )
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(&format!(
            r#"<nav><a href="{}/hidden">Menu</a></nav>
            <main><h1>Home</h1>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a></main>"#,
            base_url, base_url
        )),
        1,
    )
    .await;
    mount_page(&mock_server, "/page1", html("<p>Content 1</p>"), 1).await;
    mount_page(&mock_server, "/page2", html("<p>Content 2</p>"), 1).await;
    mount_page(&mock_server, "/hidden", html("<p>Never</p>"), 0).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let seed = format!("{}/", base_url);

    let mut coordinator = Coordinator::new(
        config,
        "test".to_string(),
        create_request(seed.clone(), 2),
        false,
    )
    .expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.pages_stored, 3);
    assert!(report.failures.is_empty());

    let storage =
        SqliteStorage::new(&dir.path().join("test.db")).expect("Failed to open DB");
    let scrape = storage
        .get_scrape_by_url(&seed)
        .unwrap()
        .expect("scrape should exist");
    let pages = storage.get_pages(scrape.id).unwrap();
    assert_eq!(pages.len(), 3);

    let home = pages.iter().find(|p| p.url == seed).unwrap();
    assert!(home.content.starts_with("# Home"));
    assert!(!home.content.contains("Menu"));
}

#[tokio::test]
async fn test_depth_limit_is_respected() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html(r#"<a href="/a.html">A</a>"#), 1).await;
    mount_page(&mock_server, "/a.html", html(r#"<a href="/b.html">B</a>"#), 1).await;
    mount_page(&mock_server, "/b.html", html("<p>Too deep</p>"), 0).await;

    let dir = TempDir::new().unwrap();
    let seed = format!("{}/", mock_server.uri());
    let mut coordinator = Coordinator::new(
        create_test_config(&dir),
        "test".to_string(),
        create_request(seed, 1),
        false,
    )
    .unwrap();

    let report = coordinator.run().await.unwrap();
    assert_eq!(report.pages_stored, 2);
    assert_eq!(report.waves, 2);
}

#[tokio::test]
async fn test_non_recursive_fetches_only_seed() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html(r#"<a href="/a.html">A</a>"#), 1).await;
    mount_page(&mock_server, "/a.html", html("<p>A</p>"), 0).await;

    let dir = TempDir::new().unwrap();
    let mut request = create_request(format!("{}/", mock_server.uri()), 5);
    request.recursive = false;

    let mut coordinator =
        Coordinator::new(create_test_config(&dir), "test".to_string(), request, false).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.pages_stored, 1);
}

#[tokio::test]
async fn test_server_error_is_retried_then_dropped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/broken.html">Broken</a> <a href="/ok.html">Ok</a>"#),
        1,
    )
    .await;
    mount_page(&mock_server, "/ok.html", html("<p>Fine</p>"), 1).await;

    Mock::given(method("GET"))
        .and(path("/broken.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut coordinator = Coordinator::new(
        create_test_config(&dir),
        "test".to_string(),
        create_request(format!("{}/", mock_server.uri()), 1),
        false,
    )
    .unwrap();

    let report = coordinator.run().await.unwrap();

    assert_eq!(report.pages_stored, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].url.ends_with("/broken.html"));
    assert!(report.failures[0].error.contains("500"));
}

#[tokio::test]
async fn test_cyclic_links_fetch_each_page_once() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html(r#"<a href="/loop.html">Loop</a>"#), 1).await;
    mount_page(&mock_server, "/loop.html", html(r#"<a href="/">Home</a>"#), 1).await;

    let dir = TempDir::new().unwrap();
    let mut coordinator = Coordinator::new(
        create_test_config(&dir),
        "test".to_string(),
        create_request(format!("{}/", mock_server.uri()), 5),
        false,
    )
    .unwrap();

    let report = coordinator.run().await.unwrap();
    assert_eq!(report.pages_stored, 2);
}

#[tokio::test]
async fn test_off_domain_links_are_not_followed() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html(&format!(
            r#"<a href="{}/elsewhere">Elsewhere</a>"#,
            other_server.uri()
        )),
        1,
    )
    .await;
    mount_page(&other_server, "/elsewhere", html("<p>Other site</p>"), 0).await;

    let dir = TempDir::new().unwrap();
    let mut coordinator = Coordinator::new(
        create_test_config(&dir),
        "test".to_string(),
        create_request(format!("{}/", mock_server.uri()), 3),
        false,
    )
    .unwrap();

    let report = coordinator.run().await.unwrap();
    assert_eq!(report.pages_stored, 1);
}

#[tokio::test]
async fn test_images_are_separated_and_exported() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(&format!(
            r#"<main><p>See <img src="{}/pic.png" alt="alt"> and text</p></main>"#,
            base_url
        )),
        1,
    )
    .await;
    // Images are never fetched as pages
    mount_page(&mock_server, "/pic.png", String::new(), 0).await;

    let dir = TempDir::new().unwrap();
    let mut request = create_request(format!("{}/", base_url), 2);
    request.include_images = true;

    let mut coordinator =
        Coordinator::new(create_test_config(&dir), "test".to_string(), request, true).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.images_found, 1);
    let export_path = report.export_path.expect("export should be written");

    let records: Vec<ExportRecord> =
        serde_json::from_str(&std::fs::read_to_string(export_path).unwrap()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].images, vec![format!("{}/pic.png", base_url)]);
    assert_eq!(records[0].content, "See and text");
}
