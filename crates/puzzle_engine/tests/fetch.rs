use std::sync::{Arc, Mutex};
use std::time::Duration;

use puzzle_engine::{DownloadEvent, FailureKind, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<DownloadEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<DownloadEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: DownloadEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[tokio::test]
async fn fetcher_returns_image_bytes_and_reports_progress() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/~foo/puzzle-bar-aaab.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"\xff\xd8jpeg".to_vec(), "image/jpeg"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let sink = TestSink::default();
    let url = format!("{}/~foo/puzzle-bar-aaab.jpg", server.uri());

    let output = fetcher.fetch(4, &url, &sink).await.expect("fetch ok");
    assert_eq!(output.bytes, b"\xff\xd8jpeg");
    assert_eq!(output.metadata.original_url, url);
    assert_eq!(output.metadata.final_url, url);
    assert_eq!(output.metadata.redirect_count, 0);
    assert_eq!(output.metadata.byte_len, 6);
    assert_eq!(output.metadata.content_type.as_deref(), Some("image/jpeg"));

    let events = sink.take();
    assert_eq!(
        events.last(),
        Some(&DownloadEvent::Received { index: 4, bytes: 6 })
    );
}

#[tokio::test]
async fn fetcher_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old.jpg"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new.jpg"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let url = format!("{}/old.jpg", server.uri());

    let output = fetcher.fetch(0, &url, &TestSink::default()).await.unwrap();
    assert_eq!(output.bytes, b"img");
    assert_eq!(output.metadata.redirect_count, 1);
    assert!(output.metadata.final_url.ends_with("/new.jpg"));
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let url = format!("{}/missing.jpg", server.uri());

    let err = fetcher.fetch(7, &url, &TestSink::default()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let url = format!("{}/slow.jpg", server.uri());

    let err = fetcher.fetch(2, &url, &TestSink::default()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let url = format!("{}/large.jpg", server.uri());

    let err = fetcher.fetch(3, &url, &TestSink::default()).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_filters_content_types_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/real.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"png".to_vec(), "image/png"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        allowed_content_types: vec!["image/*".to_string()],
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let sink = TestSink::default();

    let err = fetcher
        .fetch(0, &format!("{}/page.jpg", server.uri()), &sink)
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );

    let ok = fetcher
        .fetch(1, &format!("{}/real.png", server.uri()), &sink)
        .await
        .unwrap();
    assert_eq!(ok.bytes, b"png");
}

#[tokio::test]
async fn fetcher_rejects_unparsable_url() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher
        .fetch(0, "code.google.com/puzzle.jpg", &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

async fn mount_redirect_chain(server: &MockServer, hops: usize) {
    for hop in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/hop{hop}.jpg")))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("/hop{}.jpg", hop + 1).as_str()),
            )
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(format!("/hop{hops}.jpg")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"end".to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetcher_enforces_redirect_limit() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 3).await;
    let url = format!("{}/hop0.jpg", server.uri());

    for limit in [0, 2] {
        let settings = FetchSettings {
            redirect_limit: limit,
            ..FetchSettings::default()
        };
        let fetcher = ReqwestFetcher::new(settings).unwrap();
        let err = fetcher.fetch(0, &url, &TestSink::default()).await.unwrap_err();
        assert_eq!(err.kind, FailureKind::RedirectLimitExceeded, "limit {limit}");
    }

    let settings = FetchSettings {
        redirect_limit: 3,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let output = fetcher.fetch(0, &url, &TestSink::default()).await.unwrap();
    assert_eq!(output.bytes, b"end");
    assert_eq!(output.metadata.redirect_count, 3);
    assert!(output.metadata.final_url.ends_with("/hop3.jpg"));
}

#[tokio::test]
async fn redirect_count_is_per_request_on_a_shared_client() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 2).await;
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();

    let redirected = fetcher
        .fetch(0, &format!("{}/hop0.jpg", server.uri()), &TestSink::default())
        .await
        .unwrap();
    let direct = fetcher
        .fetch(1, &format!("{}/hop2.jpg", server.uri()), &TestSink::default())
        .await
        .unwrap();

    assert_eq!(redirected.metadata.redirect_count, 2);
    assert_eq!(direct.metadata.redirect_count, 0);
}

#[tokio::test]
async fn redirect_without_location_is_a_status_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moved.jpg"))
        .respond_with(ResponseTemplate::new(301))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher
        .fetch(0, &format!("{}/moved.jpg", server.uri()), &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(301));
}

#[tokio::test]
async fn fetcher_maps_connection_refused_to_network() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher
        .fetch(0, "http://127.0.0.1:1/puzzle-a-bbbb.jpg", &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}
