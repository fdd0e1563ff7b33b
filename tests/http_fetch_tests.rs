//! Content fetching over the real reqwest client against a local mock server

use std::sync::Arc;
use std::time::{Duration, Instant};

use threat_intel_harvester_lib::ReportContent;
use threat_intel_harvester_lib::infrastructure::config::HttpClientConfig;
use threat_intel_harvester_lib::infrastructure::{ContentFetcher, FetchError, HttpClient, PageTransport};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn fetcher() -> ContentFetcher {
    let client = HttpClient::new(&HttpClientConfig::default()).unwrap();
    ContentFetcher::new(Arc::new(client))
}

async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn html_is_kept_as_text() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/report",
        ResponseTemplate::new(200).set_body_raw("<h1>Überblick</h1>", "text/html; charset=utf-8"),
    )
    .await;

    let content = fetcher()
        .fetch(&format!("{}/report", server.uri()), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(content, ReportContent::Text("<h1>Überblick</h1>".to_string()));
}

#[tokio::test]
async fn pdf_and_octet_stream_are_kept_as_bytes() {
    let server = MockServer::start().await;
    let pdf = b"%PDF-1.7\n\x00\xff\xfe".to_vec();
    serve(
        &server,
        "/paper.pdf",
        ResponseTemplate::new(200).set_body_raw(pdf.clone(), "application/pdf"),
    )
    .await;
    serve(
        &server,
        "/sample.bin",
        ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3], "application/octet-stream"),
    )
    .await;

    let fetcher = fetcher();
    let content = fetcher
        .fetch(&format!("{}/paper.pdf", server.uri()), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(
        content,
        ReportContent::Binary {
            media_type: "application/pdf".to_string(),
            data: pdf,
        }
    );

    let content = fetcher
        .fetch(&format!("{}/sample.bin", server.uri()), TIMEOUT)
        .await
        .unwrap();
    assert!(content.is_binary());
    assert_eq!(content.len(), 3);
}

#[tokio::test]
async fn unsupported_content_type_yields_none() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/data.json",
        ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
    )
    .await;

    let url = format!("{}/data.json", server.uri());
    let fetcher = fetcher();
    assert!(matches!(
        fetcher.fetch(&url, TIMEOUT).await,
        Err(FetchError::UnsupportedContent { .. })
    ));
    assert_eq!(fetcher.fetch_or_none(&url, TIMEOUT).await, None);
}

#[tokio::test]
async fn non_200_status_is_an_error() {
    let server = MockServer::start().await;
    serve(&server, "/gone", ResponseTemplate::new(404)).await;
    serve(
        &server,
        "/empty",
        ResponseTemplate::new(204).insert_header("content-type", "text/html"),
    )
    .await;

    let client = HttpClient::new(&HttpClientConfig::default()).unwrap();
    for (route, expected) in [("/gone", 404), ("/empty", 204)] {
        let err = client
            .get(&format!("{}{}", server.uri(), route), TIMEOUT)
            .await
            .unwrap_err();
        match err {
            FetchError::HttpStatus { status, .. } => assert_eq!(status, expected),
            other => panic!("expected status error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/slow",
        ResponseTemplate::new(200)
            .set_body_raw("late", "text/html")
            .set_delay(Duration::from_secs(2)),
    )
    .await;

    let client = HttpClient::new(&HttpClientConfig::default()).unwrap();
    let err = client
        .get(&format!("{}/slow", server.uri()), Duration::from_millis(200))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout { .. }), "{err:?}");
    assert!(err.is_network());
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let client = HttpClient::new(&HttpClientConfig::default()).unwrap();
    let err = client
        .get("http://127.0.0.1:9/unreachable", TIMEOUT)
        .await
        .unwrap_err();
    assert!(err.is_network(), "{err:?}");
}

#[tokio::test]
async fn in_flight_cap_serializes_requests() {
    let server = MockServer::start().await;
    for route in ["/a", "/b"] {
        serve(
            &server,
            route,
            ResponseTemplate::new(200)
                .set_body_raw("ok", "text/html")
                .set_delay(Duration::from_millis(300)),
        )
        .await;
    }
    let (a, b) = (format!("{}/a", server.uri()), format!("{}/b", server.uri()));

    let capped = HttpClient::new(&HttpClientConfig {
        max_in_flight_requests: 1,
        ..Default::default()
    })
    .unwrap();
    let started = Instant::now();
    let (first, second) = tokio::join!(capped.get(&a, TIMEOUT), capped.get(&b, TIMEOUT));
    assert!(first.is_ok() && second.is_ok());
    assert!(started.elapsed() >= Duration::from_millis(600), "{:?}", started.elapsed());

    let unlimited = HttpClient::new(&HttpClientConfig {
        max_in_flight_requests: 0,
        ..Default::default()
    })
    .unwrap();
    let started = Instant::now();
    let (first, second) = tokio::join!(unlimited.get(&a, TIMEOUT), unlimited.get(&b, TIMEOUT));
    assert!(first.is_ok() && second.is_ok());
    assert!(started.elapsed() < Duration::from_millis(600), "{:?}", started.elapsed());
}

#[tokio::test]
async fn redirect_is_followed_to_final_url() {
    let server = MockServer::start().await;
    let target = format!("{}/final", server.uri());
    serve(
        &server,
        "/moved",
        ResponseTemplate::new(302).insert_header("location", target.as_str()),
    )
    .await;
    serve(
        &server,
        "/final",
        ResponseTemplate::new(200).set_body_raw("<p>landed</p>", "text/html"),
    )
    .await;

    let client = HttpClient::new(&HttpClientConfig::default()).unwrap();
    let response = client
        .get(&format!("{}/moved", server.uri()), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(response.url, target);
    assert_eq!(response.text(), "<p>landed</p>");

    let no_follow = HttpClient::new(&HttpClientConfig {
        follow_redirects: false,
        ..Default::default()
    })
    .unwrap();
    let err = no_follow
        .get(&format!("{}/moved", server.uri()), TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus { status: 302, .. }), "{err:?}");
}
