//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl, index and rank cycle end-to-end.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use sumi_index::config::{
    Config, CrawlerConfig, IndexConfig, RankConfig, SearchConfig, UserAgentConfig,
};
use sumi_index::storage::{open_storage, SqliteStorage, Storage};
use sumi_index::{compute_ranks, search, CrawlState, Crawler, RankParams, SearchOptions};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `seeds` into `db_path`
fn create_test_config(seeds: Vec<String>, db_path: &str, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            max_concurrent_fetches: 4,
            request_timeout_ms: 500,
            seeds,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        index: IndexConfig {
            database_path: db_path.to_string(),
        },
        rank: RankConfig::default(),
        search: SearchConfig::default(),
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

struct TestIndex {
    _dir: TempDir,
    db_path: String,
    storage: Arc<Mutex<SqliteStorage>>,
}

fn test_index() -> TestIndex {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("index.db").to_string_lossy().into_owned();
    let storage = open_storage(std::path::Path::new(&db_path)).expect("Failed to open storage");

    TestIndex {
        _dir: dir,
        db_path,
        storage: Arc::new(Mutex::new(storage)),
    }
}

#[tokio::test]
async fn test_full_crawl_index_and_search() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<p>Welcome to the garden</p>
           <a href="/roses">Red roses</a>
           <a href="/tulips">Tulips</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/roses",
        r#"<p>Roses need sun and water</p><a href="/">Home</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/tulips",
        r#"<p>Tulips bloom in spring</p><a href="/roses">Roses</a>"#,
    )
    .await;

    let index = test_index();
    let config = create_test_config(vec![format!("{}/", base_url)], &index.db_path, 2);

    let mut crawler =
        Crawler::from_config(&config, Arc::clone(&index.storage)).expect("Failed to build crawler");
    let report = crawler
        .crawl(&config.crawler.seeds)
        .await
        .expect("Crawl failed");

    assert_eq!(report.rounds, 2);
    assert_eq!(report.fetched, 3);
    assert_eq!(report.indexed, 3);
    assert_eq!(report.fetch_failures, 0);
    assert_eq!(crawler.state(), CrawlState::Done);

    let mut storage = index.storage.lock().unwrap();
    assert_eq!(storage.count_indexed_documents().unwrap(), 3);
    // Links back to already-indexed pages are still recorded
    assert_eq!(storage.count_links().unwrap(), 4);

    compute_ranks(&mut *storage, &RankParams::default()).expect("Rank failed");

    let hits = search(&*storage, "sun water", &SearchOptions::default()).expect("Search failed");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, format!("{}/roses", base_url));
}

#[tokio::test]
async fn test_failing_urls_do_not_abort_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Gone</a>
           <a href="/report.pdf">Report</a>
           <a href="/broken">Broken</a>
           <a href="/ok">Fine</a>"#,
    )
    .await;
    mount_page(&mock_server, "/ok", "Still reachable").await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let index = test_index();
    let config = create_test_config(vec![format!("{}/", base_url)], &index.db_path, 2);

    let mut crawler =
        Crawler::from_config(&config, Arc::clone(&index.storage)).expect("Failed to build crawler");
    let report = crawler
        .crawl(&config.crawler.seeds)
        .await
        .expect("Crawl failed");

    assert_eq!(report.indexed, 2);
    assert_eq!(report.fetch_failures, 3);
    assert_eq!(crawler.state(), CrawlState::Done);

    let storage = index.storage.lock().unwrap();
    assert!(storage.is_indexed(&format!("{}/ok", base_url)).unwrap());
    assert!(!storage.is_indexed(&format!("{}/missing", base_url)).unwrap());
}

#[tokio::test]
async fn test_depth_bound_is_honored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/one">One</a>"#).await;
    mount_page(&mock_server, "/one", r#"<a href="/two">Two</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(html_page("Too deep"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let index = test_index();
    let config = create_test_config(vec![format!("{}/", base_url)], &index.db_path, 2);

    let mut crawler =
        Crawler::from_config(&config, Arc::clone(&index.storage)).expect("Failed to build crawler");
    let report = crawler
        .crawl(&config.crawler.seeds)
        .await
        .expect("Crawl failed");

    assert_eq!(report.rounds, 2);
    assert_eq!(report.indexed, 2);

    let storage = index.storage.lock().unwrap();
    assert!(!storage.is_indexed(&format!("{}/two", base_url)).unwrap());
    assert_eq!(storage.count_documents().unwrap(), 3);
}

#[tokio::test]
async fn test_indexed_pages_are_not_refetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"Front page <a href="/about">About</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page(r#"About us <a href="/">Home</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let index = test_index();
    let config = create_test_config(vec![format!("{}/", base_url)], &index.db_path, 3);

    let mut first =
        Crawler::from_config(&config, Arc::clone(&index.storage)).expect("Failed to build crawler");
    let report = first
        .crawl(&config.crawler.seeds)
        .await
        .expect("First crawl failed");
    assert_eq!(report.indexed, 2);

    let mut second =
        Crawler::from_config(&config, Arc::clone(&index.storage)).expect("Failed to build crawler");
    let report = second
        .crawl(&config.crawler.seeds)
        .await
        .expect("Second crawl failed");
    assert_eq!(report.indexed, 0);
    assert_eq!(report.fetched, 0);
    assert_eq!(report.already_indexed, 1);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"Start <a href="/slow">Slow</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("Eventually").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let index = test_index();
    let config = create_test_config(vec![format!("{}/", base_url)], &index.db_path, 2);

    let mut crawler =
        Crawler::from_config(&config, Arc::clone(&index.storage)).expect("Failed to build crawler");
    let report = crawler
        .crawl(&config.crawler.seeds)
        .await
        .expect("Crawl failed");

    assert_eq!(report.indexed, 1);
    assert_eq!(report.fetch_failures, 1);
}
