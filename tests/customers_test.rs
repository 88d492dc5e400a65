//! Integration tests for the customer analytics panel.

mod common;

use axum::http::StatusCode;
use common::{customers_body, MockApi, TestClient, RANGE_QUERY};
use serde_json::Value;

async fn client_with_customers() -> (MockApi, TestClient) {
    let api = MockApi::new();
    api.respond(
        "analytics/customerAnalytics",
        StatusCode::OK,
        customers_body(5.5, 800.0),
    );
    let client = TestClient::new(&api.start().await);
    (api, client)
}

fn names(body: &Value) -> Vec<String> {
    body["top_customers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["customerName"].as_str().unwrap().to_string())
        .collect()
}

/// Test the table defaults to lifetime value, highest first.
#[tokio::test]
async fn test_customers_default_sort() {
    let (_api, client) = client_with_customers().await;

    let (status, body) = client
        .get_json(&format!("/api/dashboard/customers?{}", RANGE_QUERY))
        .await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();

    assert_eq!(body["sort"]["column"], "ltv");
    assert_eq!(body["sort"]["direction"], "desc");
    assert_eq!(names(&body), vec!["Bob Jones", "alice Smith", "Carol White"]);
}

/// Test sorting by name ignores case.
#[tokio::test]
async fn test_customers_sort_by_name() {
    let (_api, client) = client_with_customers().await;

    let (_, body) = client
        .get_json(&format!(
            "/api/dashboard/customers?{}&sort=customerName&dir=asc",
            RANGE_QUERY
        ))
        .await;
    let body = body.unwrap();

    assert_eq!(body["sort"]["column"], "customerName");
    assert_eq!(names(&body), vec!["alice Smith", "Bob Jones", "Carol White"]);
}

/// Test chart series: zero-spend bubbles dropped, donut shares, sorted registrations.
#[tokio::test]
async fn test_customers_chart_series() {
    let (_api, client) = client_with_customers().await;

    let (_, body) = client
        .get_json(&format!("/api/dashboard/customers?{}", RANGE_QUERY))
        .await;
    let body = body.unwrap();

    let bubbles = body["bubbles"].as_array().unwrap();
    assert_eq!(bubbles.len(), 2);
    assert!(bubbles.iter().all(|b| b["z"].as_f64().unwrap() > 0.0));

    let segments = body["segments"].as_array().unwrap();
    let champion = segments.iter().find(|s| s["label"] == "CHAMPION").unwrap();
    assert_eq!(champion["value"], 2);
    assert_eq!(champion["percentage"], 50);
    assert_eq!(champion["color"], "#506e9a");

    let labels: Vec<&str> = body["registrations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Dec 2023", "Jan 2024", "Feb 2024"]);

    assert_eq!(body["churn_rate"], 5.5);
    assert_eq!(body["average_lifetime_value"], 800.0);
}

/// Test the customer threshold is sent as a midnight timestamp.
#[tokio::test]
async fn test_customers_threshold_param() {
    let (api, client) = client_with_customers().await;

    client
        .get(&format!("/api/dashboard/customers?{}", RANGE_QUERY))
        .await;

    let calls = api.requests_to("analytics/customerAnalytics");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query["start"], "2024-02-01T00:00:00");
    assert_eq!(calls[0].query["end"], "2024-02-29T23:59:59");
    assert!(calls[0].query["threshold"].ends_with("T00:00:00"));
}

/// Test a registration trend with month 13 is rejected as malformed.
#[tokio::test]
async fn test_customers_invalid_month_is_bad_gateway() {
    let api = MockApi::new();
    let mut body = customers_body(1.0, 1.0);
    body["registrationTrends"][0]["month"] = serde_json::json!(13);
    api.respond("analytics/customerAnalytics", StatusCode::OK, body);
    let client = TestClient::new(&api.start().await);

    let (status, body) = client
        .get(&format!("/api/dashboard/customers?{}", RANGE_QUERY))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Unexpected response from the analytics API"));
}
