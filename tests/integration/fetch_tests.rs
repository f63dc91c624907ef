//! Retry behaviour of the fetch client against a live HTTP server

use crate::{fast_fetch_config, reqwest_client};
use company_harvest::HarvestError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_rate_limited_until_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/company/throttled"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .expect(5)
        .mount(&mock_server)
        .await;

    let config = fast_fetch_config();
    let client = reqwest_client(&config);
    let url = format!("{}/company/throttled", mock_server.uri());

    let err = client.fetch(&url).await.unwrap_err();
    match err {
        HarvestError::FetchExhausted { url: failed, attempts } => {
            assert_eq!(failed, url);
            assert_eq!(attempts, 5);
        }
        other => panic!("Expected FetchExhausted, got {other}"),
    }

    // Failures pushed the shared delay up from its floor
    let delay = client.throttle().current_delay().await;
    assert!(delay.as_secs_f64() > 0.001);
}

#[tokio::test]
async fn test_server_error_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/company/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/company/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>recovered</html>"))
        .with_priority(2)
        .mount(&mock_server)
        .await;

    let client = reqwest_client(&fast_fetch_config());
    let body = client
        .fetch(&format!("{}/company/flaky", mock_server.uri()))
        .await
        .expect("Fetch should recover after one 503");

    assert_eq!(body, "<html>recovered</html>");
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_not_found_is_returned_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/company/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest_client(&fast_fetch_config());
    let body = client
        .fetch(&format!("{}/company/missing", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "gone");
}

#[tokio::test]
async fn test_browser_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/company/headers"))
        .and(wiremock::matchers::header("accept-language", "en-US,en;q=0.9"))
        .and(wiremock::matchers::header("user-agent", "HarvestTest/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = company_harvest::config::FetchConfig {
        user_agent: "HarvestTest/1.0".to_string(),
        ..fast_fetch_config()
    };
    let client = reqwest_client(&config);

    let body = client
        .fetch(&format!("{}/company/headers", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "ok");
}
