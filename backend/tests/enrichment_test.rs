//! Tests for the calories-burned API client
//!
//! The client is pointed at a wiremock server, so these run without any
//! external dependency.

use medcalc_backend::config::EnrichmentConfig;
use medcalc_backend::integrations::CaloriesBurnedClient;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str, timeout_secs: u64) -> CaloriesBurnedClient {
    CaloriesBurnedClient::new(&EnrichmentConfig {
        enabled: true,
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        timeout_secs,
    })
    .expect("client should build")
}

#[tokio::test]
async fn test_successful_lookup_parses_activities() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/caloriesburned"))
        .and(query_param("activity", "running"))
        .and(query_param("duration", "30"))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "Running, 6 mph (10 min mile)",
                "calories_per_hour": 606,
                "duration_minutes": 30,
                "total_calories": 303
            }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 5);
    let results = client.calories_burned("running", None, Some(30)).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Running, 6 mph (10 min mile)");
    assert_eq!(results[0].calories_per_hour, 606.0);
    assert_eq!(results[0].total_calories, 303.0);
}

#[tokio::test]
async fn test_weight_is_sent_in_pounds() {
    let server = MockServer::start().await;

    // 70 kg * 2.20462 = 154.3 lb, truncated to 154 on the wire
    Mock::given(method("GET"))
        .and(path("/caloriesburned"))
        .and(query_param("activity", "swimming"))
        .and(query_param("weight", "154"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 5);
    let results = client.calories_burned("swimming", Some(70.0), None).await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_server_error_degrades_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/caloriesburned"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 5);
    let results = client.calories_burned("running", Some(70.0), Some(30)).await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_malformed_payload_degrades_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/caloriesburned"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 5);
    let results = client.calories_burned("running", Some(70.0), Some(30)).await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_timeout_degrades_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/caloriesburned"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 1);
    let results = client.calories_burned("running", Some(70.0), Some(30)).await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_disabled_client_makes_no_request() {
    let server = MockServer::start().await;

    // Any request reaching the server would fail the expectation
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = CaloriesBurnedClient::new(&EnrichmentConfig {
        enabled: false,
        base_url: server.uri(),
        api_key: String::new(),
        timeout_secs: 5,
    })
    .expect("client should build");

    let results = client.calories_burned("running", Some(70.0), Some(30)).await;
    assert!(results.is_empty());
}
