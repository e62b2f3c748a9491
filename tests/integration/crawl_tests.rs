//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_mirror::config::{parse_config, FailedResourcePolicy};
use site_mirror::crawler::{crawl, CrawlOptions};
use site_mirror::output::generate_markdown_summary;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates crawl options suitable for fast tests
fn test_options(base_folder: &Path) -> CrawlOptions {
    CrawlOptions {
        base_folder: base_folder.to_path_buf(),
        workers: 4,
        max_retries: 2,
        request_timeout: Duration::from_secs(5),
        backoff_base: Duration::from_millis(5),
        user_agent: "TestMirror/1.0".to_string(),
        failed_resources: FailedResourcePolicy::Skip,
        config_hash: None,
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_page_site_end_to_end() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body>
        <img src="/img/logo.png">
        <a href="/about">About</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/about",
        r#"<html><body>
        <img src="../img/logo.png">
        <a href="/">Home</a>
        <a href="/about#team">Team</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    // The image is referenced by both pages but must be fetched once
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"\x89PNG".to_vec(), "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawl(&format!("{}/", server.uri()), test_options(dir.path()))
        .await
        .unwrap();

    assert!(dir.path().join("index.html").is_file());
    assert!(dir.path().join("about.html").is_file());
    assert_eq!(
        std::fs::read(dir.path().join("png").join("logo.png")).unwrap(),
        b"\x89PNG"
    );
    assert!(!dir.path().join("png").join("logo_1.png").exists());

    assert_eq!(report.pages.len(), 2);
    assert!(report.page_failures.is_empty());
    assert_eq!(report.saved_downloads().count(), 1);
    assert_eq!(report.duplicate_resources_skipped, 1);
    assert!(report.duplicate_pages_skipped >= 2);
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn test_off_origin_links_are_not_followed() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<p>elsewhere</p>".to_string()))
        .expect(0)
        .mount(&external)
        .await;

    mount_page(
        &server,
        "/",
        format!(
            r#"<a href="{}/page">External</a><a href="mailto:me@example.com">Mail</a><a href="/local">Local</a>"#,
            external.uri()
        ),
    )
    .await;
    mount_page(&server, "/local", "<p>local</p>".to_string()).await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawl(&server.uri(), test_options(dir.path())).await.unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.off_origin_links, 1);
    assert!(dir.path().join("local.html").is_file());
}

#[tokio::test]
async fn test_resources_from_other_hosts_are_downloaded() {
    let server = MockServer::start().await;
    let cdn = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lib.js"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("console.log(1)", "application/javascript"),
        )
        .expect(1)
        .mount(&cdn)
        .await;

    mount_page(
        &server,
        "/",
        format!(r#"<script src="{}/lib.js"></script>"#, cdn.uri()),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    crawl(&server.uri(), test_options(dir.path())).await.unwrap();

    assert!(dir.path().join("js").join("lib.js").is_file());
}

#[tokio::test]
async fn test_failures_are_reported_and_crawl_continues() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<link rel="stylesheet" href="/site.css">
        <script src="/broken.js"></script>
        <a href="/missing">Missing</a>
        <a href="/ok">Ok</a>"#
            .to_string(),
    )
    .await;
    mount_page(&server, "/ok", "<p>fine</p>".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/site.css"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("p {}", "text/css"))
        .mount(&server)
        .await;

    // Exactly max_retries attempts for a resource that keeps failing
    Mock::given(method("GET"))
        .and(path("/broken.js"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawl(&server.uri(), test_options(dir.path())).await.unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.page_failures.len(), 1);
    assert!(report.page_failures[0].url.ends_with("/missing"));

    let failed: Vec<_> = report.failed_downloads().collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].url.ends_with("/broken.js"));
    assert_eq!(failed[0].attempts, 2);

    assert!(dir.path().join("css").join("site.css").is_file());
    assert!(!dir.path().join("missing.html").exists());
}

#[tokio::test]
async fn test_same_basename_resources_get_numbered() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<img src="/a/icon.png"><img src="/b/icon.png"><img src="/c/icon.png">"#.to_string(),
    )
    .await;
    for dir in ["a", "b", "c"] {
        Mock::given(method("GET"))
            .and(path(format!("/{}/icon.png", dir)))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(dir.as_bytes().to_vec(), "image/png"),
            )
            .mount(&server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let report = crawl(&server.uri(), test_options(dir.path())).await.unwrap();

    let png = dir.path().join("png");
    let mut bodies: Vec<_> = ["icon.png", "icon_1.png", "icon_2.png"]
        .iter()
        .map(|name| std::fs::read_to_string(png.join(name)).unwrap())
        .collect();
    bodies.sort();

    assert_eq!(bodies, vec!["a", "b", "c"]);
    assert_eq!(report.saved_downloads().count(), 3);
}

#[tokio::test]
async fn test_nested_pages_are_flattened() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/docs/guide/">Guide</a>"#.to_string()).await;
    mount_page(
        &server,
        "/docs/guide/",
        r#"<html><body><div><p>Guide</p></div></body></html>"#.to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    crawl(&server.uri(), test_options(dir.path())).await.unwrap();

    let saved = std::fs::read_to_string(dir.path().join("docs_guide.html")).unwrap();
    assert!(saved.contains("\n    <div>\n"));
}

#[tokio::test]
async fn test_user_agent_sent_with_page_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(wiremock::matchers::header("user-agent", "TestMirror/1.0"))
        .respond_with(html("<p>hello</p>".to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawl(&server.uri(), test_options(dir.path())).await.unwrap();

    assert_eq!(report.pages.len(), 1);
}

#[tokio::test]
async fn test_invalid_start_url_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    assert!(crawl("not a url", test_options(dir.path())).await.is_err());
    assert!(crawl("ftp://example.com/", test_options(dir.path()))
        .await
        .is_err());
}

#[tokio::test]
async fn test_config_file_drives_crawl_and_summary() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>home</p>".to_string()).await;

    let dir = tempfile::tempdir().unwrap();
    let config = parse_config(&format!(
        r#"
[crawler]
workers = 2
max-retries = 1

[user-agent]
value = "ConfiguredAgent/2.0"

[output]
base-folder = "{}"
"#,
        dir.path().join("mirror").display()
    ))
    .unwrap();

    let mut options = CrawlOptions::from_config(&config);
    options.config_hash = Some("deadbeef".to_string());
    assert_eq!(options.workers, 2);
    assert_eq!(options.max_retries, 1);

    let report = crawl(&server.uri(), options).await.unwrap();
    assert!(dir.path().join("mirror").join("index.html").is_file());

    let summary_path = dir.path().join("SUMMARY.md");
    generate_markdown_summary(&report, &summary_path).unwrap();
    let summary = std::fs::read_to_string(&summary_path).unwrap();
    assert!(summary.contains("| Pages saved | 1 |"));
    assert!(summary.contains("deadbeef"));
}
