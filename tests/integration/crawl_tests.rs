//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the APOD archive and run full
//! two-phase crawls into temporary directories.

use apod_crawler::config::CrawlerConfig;
use apod_crawler::crawler::{crawl, CrawlOutcome, Crawler};
use apod_crawler::FetchError;
use chrono::NaiveDate;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, dir: &Path, concurrency: usize) -> CrawlerConfig {
    let mut config = CrawlerConfig::new(dir, date(2022, 1, 1), date(2022, 1, 3));
    config.concurrency = concurrency;
    config.http.base_url = format!("{}/apod/", server.uri());
    config.http.timeout_secs = 5;
    config
}

/// Mounts a daily page linking `image_path`
async fn mount_page(server: &MockServer, yymmdd: &str, image_path: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/apod/ap{}.html", yymmdd)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    r#"<html><head><title>APOD {yymmdd}</title></head><body><center>
                    <a href="{image_path}"><IMG SRC="image/small.jpg"></a>
                    </center><a href="archivepix.html">Archive</a></body></html>"#
                ))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts an image at `image_path` with the given body
async fn mount_image(server: &MockServer, image_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/apod/{}", image_path)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.to_vec())
                .insert_header("content-type", "image/jpeg"),
        )
        .mount(server)
        .await;
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_crawl_downloads_every_image() {
    let server = MockServer::start().await;

    mount_page(&server, "220101", "image/2201/first_1024.jpg").await;
    mount_page(&server, "220102", "image/2201/second_1024.jpg").await;
    mount_page(&server, "220103", "image/2201/third_1024.jpg").await;
    mount_image(&server, "image/2201/first_1024.jpg", b"first image").await;
    mount_image(&server, "image/2201/second_1024.jpg", &[7u8; 20_000]).await;
    mount_image(&server, "image/2201/third_1024.jpg", b"third").await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawl(create_test_config(&server, dir.path(), 2))
        .await
        .expect("crawl should start");

    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.pages_found(), 3);
    assert_eq!(report.images_downloaded(), 3);
    assert_eq!(report.bytes_written(), 11 + 20_000 + 5);

    // Page outcomes are reported in date order
    let dates: Vec<_> = report.pages.iter().map(|(d, _)| *d).collect();
    assert_eq!(dates, vec![date(2022, 1, 1), date(2022, 1, 2), date(2022, 1, 3)]);

    assert_eq!(
        files_in(dir.path()),
        vec!["first_1024.jpg", "second_1024.jpg", "third_1024.jpg"]
    );
    assert_eq!(
        std::fs::read(dir.path().join("second_1024.jpg")).unwrap().len(),
        20_000
    );
}

#[tokio::test]
async fn test_server_error_on_one_page_does_not_abort_crawl() {
    let server = MockServer::start().await;

    mount_page(&server, "220101", "image/2201/first_1024.jpg").await;
    Mock::given(method("GET"))
        .and(path("/apod/ap220102.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "220103", "image/2201/third_1024.jpg").await;
    mount_image(&server, "image/2201/first_1024.jpg", b"first").await;
    mount_image(&server, "image/2201/third_1024.jpg", b"third").await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawl(create_test_config(&server, dir.path(), 2))
        .await
        .expect("crawl should start");

    assert_eq!(report.pages_found(), 2);
    assert_eq!(report.pages_failed(), 1);
    assert!(matches!(
        &report.pages[1],
        (d, CrawlOutcome::Failed(FetchError::Status { status, .. }))
            if *d == date(2022, 1, 2) && status.as_u16() == 500
    ));
    assert_eq!(report.images_downloaded(), 2);
    assert_eq!(
        files_in(dir.path()),
        vec!["first_1024.jpg", "third_1024.jpg"]
    );
}

#[tokio::test]
async fn test_page_without_image_and_missing_image() {
    let server = MockServer::start().await;

    mount_page(&server, "220101", "image/2201/first_1024.jpg").await;
    Mock::given(method("GET"))
        .and(path("/apod/ap220102.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><iframe src="https://www.youtube.com/embed/abc"></iframe></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "220103", "image/2201/missing.jpg").await;
    mount_image(&server, "image/2201/first_1024.jpg", b"first").await;
    Mock::given(method("GET"))
        .and(path("/apod/image/2201/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawl(create_test_config(&server, dir.path(), 3))
        .await
        .expect("crawl should start");

    assert_eq!(report.pages_found(), 2);
    assert_eq!(report.pages_not_found(), 1);
    assert_eq!(report.images.len(), 2);
    assert_eq!(report.images_downloaded(), 1);
    assert_eq!(report.images_failed(), 1);
    assert_eq!(files_in(dir.path()), vec!["first_1024.jpg"]);
}

#[tokio::test]
async fn test_same_file_name_later_date_wins() {
    let server = MockServer::start().await;

    mount_page(&server, "220101", "image/2101/moon.jpg").await;
    mount_page(&server, "220102", "image/2201/sun.jpg").await;
    mount_page(&server, "220103", "image/2201/moon.jpg").await;
    mount_image(&server, "image/2101/moon.jpg", b"old moon, longer body").await;
    mount_image(&server, "image/2201/sun.jpg", b"sun").await;
    mount_image(&server, "image/2201/moon.jpg", b"new moon").await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawl(create_test_config(&server, dir.path(), 4))
        .await
        .expect("crawl should start");

    // Both moon images are attempted
    assert_eq!(report.images_downloaded(), 3);
    assert_eq!(files_in(dir.path()), vec!["moon.jpg", "sun.jpg"]);
    assert_eq!(
        std::fs::read(dir.path().join("moon.jpg")).unwrap(),
        b"new moon"
    );
}

#[tokio::test]
async fn test_rerun_overwrites_instead_of_appending() {
    let server = MockServer::start().await;

    for day in ["220101", "220102", "220103"] {
        let image_path = format!("image/2201/{}.jpg", day);
        Mock::given(method("GET"))
            .and(path(format!("/apod/ap{}.html", day)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!(r#"<a href="{}">pic</a>"#, image_path)),
            )
            .expect(2)
            .mount(&server)
            .await;
        mount_image(&server, &image_path, day.as_bytes()).await;
    }

    let dir = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        let crawler = Crawler::new(create_test_config(&server, dir.path(), 1)).unwrap();
        let report = crawler.crawl().await;
        assert_eq!(report.images_downloaded(), 3);
    }

    assert_eq!(
        std::fs::read(dir.path().join("220102.jpg")).unwrap(),
        b"220102"
    );
}
