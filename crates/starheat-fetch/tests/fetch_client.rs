//! Integration tests for `FetchClient` retry semantics.
//!
//! Uses `wiremock` to stand up a local server per test, so attempt counts
//! can be asserted via mock expectations without real network traffic.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use starheat_fetch::FetchClient;

/// A client with no backoff sleep so tests run instantly.
fn test_client(max_attempts: u32) -> FetchClient {
    FetchClient::new(5, "starheat-test/0.1", max_attempts, 0)
        .expect("failed to build test FetchClient")
}

#[tokio::test]
async fn returns_success_after_two_transient_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(3);
    let response = client.get(&format!("{}/data", server.uri()), &[]).await;

    let response = response.expect("expected a response after retries");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn permanent_status_returns_on_first_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(3);
    let response = client.get(&format!("{}/missing", server.uri()), &[]).await;

    let response = response.expect("a 404 is still a response");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn exhaustion_returns_the_last_transient_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(2);
    let response = client.get(&format!("{}/flaky", server.uri()), &[]).await;

    let response = response.expect("last transient response is returned");
    assert_eq!(response.status().as_u16(), 429);
}

#[tokio::test]
async fn transport_failure_on_every_attempt_yields_none() {
    // Port 1 is never listening; every attempt fails at connect time.
    let client = test_client(2);
    let response = client.get("http://127.0.0.1:1/unreachable", &[]).await;
    assert!(response.is_none());
}

#[tokio::test]
async fn query_parameters_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("srsearch", "Simone Biles"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"found": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(1);
    let value = client
        .get_json(
            &format!("{}/search", server.uri()),
            &[("srsearch", "Simone Biles"), ("format", "json")],
        )
        .await;

    assert_eq!(value.unwrap()["found"], json!(true));
}

#[tokio::test]
async fn get_json_rejects_non_200_and_bad_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(1);
    assert!(client
        .get_json(&format!("{}/gone", server.uri()), &[])
        .await
        .is_none());
    assert!(client
        .get_json(&format!("{}/garbled", server.uri()), &[])
        .await
        .is_none());
}
