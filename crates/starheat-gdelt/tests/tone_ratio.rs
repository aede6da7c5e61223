//! Integration tests for the GDELT tone-ratio client against wiremock.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use starheat_core::{Granularity, PeriodKey};
use starheat_fetch::FetchClient;
use starheat_gdelt::GdeltClient;
use starheat_heat::RatioSource;

fn test_client(server: &MockServer) -> GdeltClient {
    let fetch =
        FetchClient::new(5, "starheat-test/0.1", 1, 0).expect("failed to build test FetchClient");
    GdeltClient::with_base_url(fetch, &format!("{}/api/v2/doc/doc", server.uri()))
}

fn window(
) -> (chrono::NaiveDateTime, chrono::NaiveDateTime) {
    let period = PeriodKey::of(
        NaiveDate::from_ymd_opt(2021, 5, 15).unwrap(),
        Granularity::Month,
    );
    (period.start(), period.end())
}

fn articles_with_tones(tones: &[serde_json::Value]) -> serde_json::Value {
    json!({
        "articles": tones
            .iter()
            .map(|tone| json!({ "url": "https://news.example.com/a", "tone": tone }))
            .collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn three_negative_of_ten_is_exactly_zero_point_three() {
    let server = MockServer::start().await;

    let tones: Vec<serde_json::Value> = [
        -2.1, 3.0, 1.2, -0.5, 0.0, 4.4, 2.2, -1.0, 5.0, 1.1,
    ]
    .iter()
    .map(|t| json!(t))
    .collect();

    Mock::given(method("GET"))
        .and(path("/api/v2/doc/doc"))
        .and(query_param("query", "\"Simone Biles\""))
        .and(query_param("mode", "ArtList"))
        .and(query_param("maxrecords", "250"))
        .and(query_param("sort", "DateDesc"))
        .and(query_param("startdatetime", "20210501000000"))
        .and(query_param("enddatetime", "20210531235959"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&articles_with_tones(&tones)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let (start, end) = window();
    let ratio = client.negative_tone_ratio("Simone Biles", start, end).await;

    assert!((ratio - 0.3).abs() < f64::EPSILON, "expected 0.3, got {ratio}");
}

#[tokio::test]
async fn zero_articles_is_exactly_zero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/doc/doc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "articles": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let (start, end) = window();
    assert_eq!(client.negative_tone_ratio("Nobody", start, end).await, 0.0);
}

#[tokio::test]
async fn missing_articles_field_is_zero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/doc/doc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let (start, end) = window();
    assert_eq!(client.negative_tone_ratio("Nobody", start, end).await, 0.0);
}

#[tokio::test]
async fn unclassifiable_tones_are_skipped() {
    let server = MockServer::start().await;

    let tones = vec![json!("not a number"), json!(null), json!("-3.5"), json!(2.0)];
    Mock::given(method("GET"))
        .and(path("/api/v2/doc/doc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&articles_with_tones(&tones)))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let (start, end) = window();
    let ratio = client.negative_tone_ratio("Mixed Bag", start, end).await;

    // Two classifiable tones, one negative.
    assert!((ratio - 0.5).abs() < f64::EPSILON, "expected 0.5, got {ratio}");
}

#[tokio::test]
async fn http_failure_defaults_to_zero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/doc/doc"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let (start, end) = window();
    assert_eq!(client.negative_tone_ratio("Gone", start, end).await, 0.0);
}

#[tokio::test]
async fn ratio_source_expands_the_period_to_its_full_span() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/doc/doc"))
        .and(query_param("query", "\"Zendaya\""))
        .and(query_param("startdatetime", "20210501000000"))
        .and(query_param("enddatetime", "20210531235959"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&articles_with_tones(&[json!(-1.0), json!(1.0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let period = PeriodKey::of(
        NaiveDate::from_ymd_opt(2021, 5, 15).unwrap(),
        Granularity::Month,
    );
    let ratio = client.negative_ratio("Zendaya", &period).await;

    assert!((ratio - 0.5).abs() < f64::EPSILON);
}
