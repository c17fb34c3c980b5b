//! Integration tests for the health metric endpoints

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_metric_creates_user() {
    let app = TestApp::new().await;
    let user_id = TestApp::unique_user_id("metric");

    let body = json!({
        "user_id": user_id,
        "metric_type": "glucose",
        "value": 5.4,
        "unit": "mmol/l",
        "notes": "fasting"
    });
    let (status, response) = app.post("/api/v1/metrics", &body.to_string()).await;

    assert_eq!(status, StatusCode::CREATED);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["metric_type"], "glucose");
    assert_eq!(response["value"], 5.4);
    assert_eq!(response["notes"], "fasting");

    assert_eq!(app.count_rows("users", &user_id).await, 1);
    assert_eq!(app.count_rows("health_metrics", &user_id).await, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_metric_rejects_blank_unit() {
    let app = TestApp::new().await;
    let user_id = TestApp::unique_user_id("metric-unit");

    let body = json!({
        "user_id": user_id,
        "metric_type": "glucose",
        "value": 5.4,
        "unit": ""
    });
    let (status, _) = app.post("/api/v1/metrics", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count_rows("health_metrics", &user_id).await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_metrics_filters_by_type_newest_first() {
    let app = TestApp::new().await;
    let user_id = TestApp::unique_user_id("metric-list");

    for (metric_type, value) in [("pulse", 62.0), ("pulse", 64.0), ("glucose", 5.2)] {
        let body = json!({
            "user_id": user_id,
            "metric_type": metric_type,
            "value": value,
            "unit": "x"
        });
        let (status, _) = app.post("/api/v1/metrics", &body.to_string()).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, response) = app
        .get(&format!(
            "/api/v1/metrics?user_id={user_id}&metric_type=pulse"
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let items: serde_json::Value = serde_json::from_str(&response).unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);
    // Newest first: the 64.0 reading was stored last
    assert_eq!(items[0]["value"], 64.0);
    assert_eq!(items[1]["value"], 62.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_metric_enforces_existence_then_ownership() {
    let app = TestApp::new().await;
    let owner = TestApp::unique_user_id("metric-owner");
    let intruder = TestApp::unique_user_id("metric-intruder");

    let body = json!({
        "user_id": owner,
        "metric_type": "pulse",
        "value": 62.0,
        "unit": "bpm"
    });
    let (_, response) = app.post("/api/v1/metrics", &body.to_string()).await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let id = response["id"].as_i64().unwrap();

    // Missing id: NotFound, evaluated before ownership
    let (status, _) = app
        .delete(&format!("/api/v1/metrics/{}?user_id={intruder}", i64::MAX))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Wrong owner: Forbidden
    let (status, _) = app
        .delete(&format!("/api/v1/metrics/{id}?user_id={intruder}"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.count_rows("health_metrics", &owner).await, 1);

    // Owner: deleted
    let (status, _) = app
        .delete(&format!("/api/v1/metrics/{id}?user_id={owner}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.count_rows("health_metrics", &owner).await, 0);
}
