//! Miscellaneous integration tests (health check, dashboard page, fallbacks).

mod common;

use axum::http::StatusCode;
use common::{
    customers_body, kpi_body, sales_body, MockApi, TestClient, CURRENT_DAY, PREVIOUS_DAY,
    RANGE_QUERY,
};

/// Test health endpoint.
#[tokio::test]
async fn test_health_endpoint() {
    let api = MockApi::new();
    let client = TestClient::new(&api.start().await);
    let (status, body) = client.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

/// Test the dashboard page renders KPI cards and the heatmap.
#[tokio::test]
async fn test_dashboard_page_renders() {
    let api = MockApi::new();
    api.respond_for_day("analytics/kpi", CURRENT_DAY, StatusCode::OK, kpi_body(2500.0, 20, 90))
        .respond_for_day("analytics/kpi", PREVIOUS_DAY, StatusCode::OK, kpi_body(2000.0, 25, 80))
        .respond(
            "analytics/customerAnalytics",
            StatusCode::OK,
            customers_body(4.0, 300.0),
        )
        .respond("analytics/salesAnalytics", StatusCode::OK, sales_body());
    let client = TestClient::new(&api.start().await);

    let (status, body) = client.get(&format!("/?{}", RANGE_QUERY)).await;
    assert_eq!(status, StatusCode::OK);

    assert!(body.contains("Total Sales"));
    assert!(body.contains("$2,500.00"));
    assert!(body.contains("Churn Rate"));
    assert!(body.contains("trend-UP"));
    assert!(body.contains("Feb 1 – Feb 29, 2024"));
    assert!(body.contains("heatmap-grid"));
    assert!(body.contains("#ef4444"));
    assert!(!body.contains("error-panel"));
}

/// Test a failing backend renders error panels instead of failing the page.
#[tokio::test]
async fn test_dashboard_page_with_backend_errors() {
    let api = MockApi::new();
    api.respond(
        "analytics/kpi",
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "message": "KPI service exploded" }),
    );
    let client = TestClient::new(&api.start().await);

    let (status, body) = client.get(&format!("/?{}", RANGE_QUERY)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("error-panel"));
    assert!(body.contains("KPI service exploded"));
    assert!(body.contains("Retry"));
    assert!(!body.contains("kpi-card"));
}

/// Test an invalid range on the page falls back to the default period.
#[tokio::test]
async fn test_dashboard_page_invalid_range() {
    let api = MockApi::new();
    api.respond("analytics/kpi", StatusCode::OK, kpi_body(1.0, 1, 1))
        .respond("analytics/salesAnalytics", StatusCode::OK, sales_body());
    let client = TestClient::new(&api.start().await);

    let (status, body) = client
        .get("/?preset=custom&from_date=2024-03-01&to_date=2024-02-01")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Start date must be before the end date"));
    assert!(body.contains("Last 30 days"));
}

/// Test unknown routes get the full error page.
#[tokio::test]
async fn test_unknown_route_is_404_page() {
    let api = MockApi::new();
    let client = TestClient::new(&api.start().await);

    let (status, body) = client.get_full("/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404 Not Found"));
    assert!(body.contains("t exist."));
}

/// Test API errors keep their fragment body behind the full middleware stack.
#[tokio::test]
async fn test_api_errors_not_wrapped_in_page() {
    let api = MockApi::new();
    let client = TestClient::new(&api.start().await);

    let (status, body) = client.get_full("/api/dashboard/kpi?preset=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Unknown date preset"));
    assert!(!body.contains("<html"));
}
