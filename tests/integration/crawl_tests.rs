//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full mirror cycle end-to-end against a temporary output directory.

use sha1::{Digest, Sha1};
use site_mirror::config::{Config, CrawlerConfig};
use site_mirror::crawler::{run_crawl, Coordinator};
use site_mirror::output::CrawlSummary;
use site_mirror::state::PageState;
use site_mirror::DepthWindow;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `output_dir`
fn create_test_config(output_dir: &Path, depth: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            depth: depth.parse::<DepthWindow>().expect("Invalid depth"),
            output_dir: output_dir.to_path_buf(),
            include_cross_origin_assets: true,
        },
        ..Config::default()
    }
}

/// Project directory for a wiremock server (always bound to 127.0.0.1)
fn project_dir(output_dir: &Path) -> PathBuf {
    output_dir.join("127_0_0_1")
}

fn html(body: &str) -> ResponseTemplate {
    typed(body.as_bytes(), "text/html; charset=utf-8")
}

fn typed(body: &[u8], content_type: &str) -> ResponseTemplate {
    // set_body_raw sets the mime wiremock serves; a plain content-type
    // header would be overridden by it
    ResponseTemplate::new(200).set_body_raw(body.to_vec(), content_type)
}

async fn mirror(server: &MockServer, output_dir: &Path, depth: &str) -> CrawlSummary {
    let config = create_test_config(output_dir, depth);
    let base_url = Url::parse(&server.uri()).expect("Failed to parse base URL");
    let mut coordinator = Coordinator::new(config, base_url).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed")
}

fn read(path: PathBuf) -> String {
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

fn state_of(summary: &CrawlSummary, server: &MockServer, path: &str) -> Option<PageState> {
    let url = Url::parse(&format!("{}{}", server.uri(), path)).ok()?;
    summary.outcome_for(&url).map(|outcome| outcome.state)
}

#[tokio::test]
async fn test_depth_zero_saves_page_and_assets() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head>
            <link rel="stylesheet" href="/css/site.css">
            <script src="/js/app.js"></script>
            </head><body>
            <img src="/img/logo.png" srcset="/img/logo.png 1x, /img/logo@2x.png 2x">
            <a href="/about">About</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/css/site.css"))
        .respond_with(typed(b"body { margin: 0 }", "text/css"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/js/app.js"))
        .respond_with(typed(b"console.log(1)", "application/javascript"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Referenced by both src and srcset, fetched once
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(typed(&[0x89, b'P', b'N', b'G'], "image/png"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/logo@2x.png"))
        .respond_with(typed(&[0x89, b'P', b'N', b'G', 2], "image/png"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Depth 1 is beyond the window and must never be fetched
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>About</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let summary = mirror(&mock_server, dir.path(), "0").await;

    assert_eq!(summary.total_urls(), 1);
    assert_eq!(summary.count(PageState::AnalyzedAndStored), 1);
    assert_eq!(summary.assets_saved, 4);

    let root = project_dir(dir.path());
    assert!(root.join("css/site.css").is_file());
    assert!(root.join("js/app.js").is_file());
    assert_eq!(
        std::fs::read(root.join("img/logo.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );

    let page = read(root.join("index.html"));
    assert!(page.contains(r#"href="css/site.css""#), "{}", page);
    assert!(page.contains(r#"src="js/app.js""#), "{}", page);
    assert!(page.contains(r#"src="img/logo.png""#), "{}", page);
    assert!(
        page.contains(r#"srcset="img/logo.png 1x, img/logo@2x.png 2x""#),
        "{}",
        page
    );
    // No local copy of /about, so the link is left alone
    assert!(page.contains(r#"href="/about""#), "{}", page);
}

#[tokio::test]
async fn test_depth_window_crawls_only_outside_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/level1">Level 1</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html(r#"<a href="/level2">Level 2</a><a href="/">Home</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html(r#"<a href="/level3">Level 3</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html("<p>Too deep</p>"))
        .expect(0) // Should never be called with max depth 2
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let summary = mirror(&mock_server, dir.path(), "1-2").await;

    // Wiremock will automatically verify expect(0) when the mock server drops
    assert_eq!(state_of(&summary, &mock_server, "/"), Some(PageState::CrawledOnly));
    assert_eq!(
        state_of(&summary, &mock_server, "/level1"),
        Some(PageState::AnalyzedAndStored)
    );
    assert_eq!(
        state_of(&summary, &mock_server, "/level2"),
        Some(PageState::AnalyzedAndStored)
    );

    let root = project_dir(dir.path());
    assert!(!root.join("index.html").exists());
    assert!(root.join("level1.html").is_file());
    assert!(root.join("level2.html").is_file());
    assert!(!root.join("level3.html").exists());

    // level2.html was not on disk yet when level1 was rewritten
    let level1 = read(root.join("level1.html"));
    assert!(level1.contains(r#"href="/level2""#), "{}", level1);
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let mock_server = MockServer::start().await;

    for (page, body) in [
        ("/", r#"<a href="/a">A</a><a href="/b">B</a><a href="/a#top">A again</a>"#),
        ("/a", r#"<a href="/b">B</a><a href="/">Home</a><a href="/a">Self</a>"#),
        ("/b", r#"<a href="/a">A</a><a href="/">Home</a>"#),
    ] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html(body))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().expect("Failed to create temp dir");
    let summary = mirror(&mock_server, dir.path(), "5").await;

    assert_eq!(summary.total_urls(), 3);
    assert_eq!(summary.count(PageState::AnalyzedAndStored), 3);

    // Breadth-first, siblings in the order the seed links them
    let visited: Vec<(String, u32)> = summary
        .outcomes
        .iter()
        .map(|o| (o.url.path().to_string(), o.depth))
        .collect();
    assert_eq!(
        visited,
        vec![("/".to_string(), 0), ("/a".to_string(), 1), ("/b".to_string(), 1)]
    );

    // /a is on disk by the time /b is rewritten
    let b = read(project_dir(dir.path()).join("b.html"));
    assert!(b.contains(r#"href="a.html""#), "{}", b);
    assert!(b.contains(r#"href="index.html""#), "{}", b);
}

#[tokio::test]
async fn test_failures_do_not_abort_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<img src="/missing.png"><a href="/broken">Broken</a><a href="/ok">OK</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html("<p>fine</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let summary = mirror(&mock_server, dir.path(), "1").await;

    let broken = Url::parse(&format!("{}/broken", mock_server.uri())).unwrap();
    let outcome = summary.outcome_for(&broken).expect("broken page not processed");
    assert_eq!(outcome.state, PageState::Failed);
    assert!(outcome.detail.as_deref().unwrap_or("").contains("500"));

    assert_eq!(
        state_of(&summary, &mock_server, "/ok"),
        Some(PageState::AnalyzedAndStored)
    );
    assert_eq!(summary.assets_failed, 1);

    let root = project_dir(dir.path());
    assert!(root.join("ok.html").is_file());
    assert!(!root.join("broken.html").exists());

    let index = read(root.join("index.html"));
    assert!(index.contains(r#"src="/missing.png""#), "{}", index);
}

#[tokio::test]
async fn test_cross_origin_references_untouched() {
    let mock_server = MockServer::start().await;
    // Same server under another host name is another origin
    let foreign = mock_server.uri().replace("127.0.0.1", "localhost");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"<script src="{0}/vendor/lib.js"></script><a href="{0}/elsewhere">Away</a>"#,
            foreign
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/vendor/lib.js"))
        .respond_with(typed(b"lib()", "application/javascript"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(html("<p>away</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let summary = mirror(&mock_server, dir.path(), "2").await;

    assert_eq!(summary.total_urls(), 1);

    let index = read(project_dir(dir.path()).join("index.html"));
    assert!(
        index.contains(&format!(r#"src="{}/vendor/lib.js""#, foreign)),
        "{}",
        index
    );
}

#[tokio::test]
async fn test_query_pages_get_hashed_names() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/search?q=test">Search</a><a href="/search">Plain</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "test"))
        .respond_with(html("<p>results</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html("<p>search form</p>"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    mirror(&mock_server, dir.path(), "1").await;

    let digest = hex::encode(Sha1::digest(b"q=test"));
    let root = project_dir(dir.path());

    let results = read(root.join(format!("search__{}.html", &digest[..12])));
    assert!(results.contains("results"));
    assert!(read(root.join("search.html")).contains("search form"));
}

#[tokio::test]
async fn test_xml_pages_and_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/feed.xml">Feed</a><a href="/broken.xml">Broken</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(typed(
            br#"<?xml version="1.0"?><feed><entry><title>One &amp; two</title></entry></feed>"#,
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    // Mismatched end tag: strict parse fails, lenient parse still finds the link
    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(typed(
            br#"<root><a href="/from-broken">x</root>"#,
            "text/xml",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/from-broken"))
        .respond_with(html("<p>reached</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let summary = mirror(&mock_server, dir.path(), "2").await;

    assert_eq!(
        state_of(&summary, &mock_server, "/broken.xml"),
        Some(PageState::AnalyzedAndStored)
    );

    let root = project_dir(dir.path());
    assert_eq!(
        read(root.join("feed.xml")),
        r#"<?xml version="1.0"?><feed><entry><title>One &amp; two</title></entry></feed>"#
    );
    assert!(root.join("broken.xml").is_file());
    assert!(root.join("from-broken.html").is_file());
}

#[tokio::test]
async fn test_non_page_links_stored_as_assets() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/files/report">Report</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/report"))
        .respond_with(typed(b"%PDF-1.4", "application/pdf"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let summary = mirror(&mock_server, dir.path(), "1").await;

    let outcome = summary
        .outcome_for(&Url::parse(&format!("{}/files/report", mock_server.uri())).unwrap())
        .expect("report not processed");
    assert_eq!(outcome.state, PageState::StoredAsAsset);

    let stored = project_dir(dir.path()).join("files/report.pdf");
    assert_eq!(outcome.local_path.as_deref(), Some(stored.as_path()));
    assert_eq!(std::fs::read(stored).unwrap(), b"%PDF-1.4");
}

#[tokio::test]
async fn test_run_crawl_rejects_bad_base_url() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), "0");

    assert!(run_crawl(config.clone(), "ftp://example.com/").await.is_err());
    assert!(run_crawl(config, "example.com").await.is_err());
}
