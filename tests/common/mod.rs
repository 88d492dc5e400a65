//! Shared test utilities for integration tests.
//!
//! `MockApi` is an in-process stand-in for the analytics backend: an axum
//! router bound to an ephemeral port that answers with canned JSON. Responses
//! are keyed by path and, optionally, by the date part of the `start` query
//! parameter, so the current and previous period of one screen can succeed or
//! fail independently. `TestClient` drives the dashboard router with
//! `oneshot` requests against such a backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use ecomdash::client::AnalyticsClient;
use ecomdash::config::Config;
use ecomdash::handlers;
use ecomdash::server::{build_app, serve};
use ecomdash::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Custom range used by most tests, and the matching previous period.
pub const RANGE_QUERY: &str = "preset=custom&from_date=2024-02-01&to_date=2024-02-29";
pub const CURRENT_DAY: &str = "2024-02-01";
pub const PREVIOUS_DAY: &str = "2024-01-03";

/// A request the mock backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: String,
}

type RouteKey = (String, Option<String>);

#[derive(Clone, Default)]
pub struct MockApi {
    routes: Arc<Mutex<HashMap<RouteKey, (StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    delays: Arc<Mutex<HashMap<RouteKey, Duration>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` (relative to `/api/`) for every `start` date.
    pub fn respond(&self, path: &str, status: StatusCode, body: Value) -> &Self {
        self.insert(path, None, status, body.to_string())
    }

    /// Answer `path` only when `start` begins with `day` (`YYYY-MM-DD`).
    pub fn respond_for_day(&self, path: &str, day: &str, status: StatusCode, body: Value) -> &Self {
        self.insert(path, Some(day.to_string()), status, body.to_string())
    }

    /// Answer `path` with a raw, possibly invalid, body.
    pub fn respond_raw(&self, path: &str, status: StatusCode, body: &str) -> &Self {
        self.insert(path, None, status, body.to_string())
    }

    fn insert(&self, path: &str, day: Option<String>, status: StatusCode, body: String) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert((path.to_string(), day), (status, body));
        self
    }

    /// Hold answers to `path` for `delay` when `start` begins with `day`.
    pub fn delay_for_day(&self, path: &str, day: &str, delay: Duration) -> &Self {
        self.delays
            .lock()
            .unwrap()
            .insert((path.to_string(), Some(day.to_string())), delay);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Bind to an ephemeral port and return the base URL to hand to the client.
    pub async fn start(&self) -> String {
        let router = Router::new().fallback(mock_handler).with_state(self.clone());
        let (port, _handle) = serve(router, "127.0.0.1", 0)
            .await
            .expect("Failed to start mock analytics API");
        format!("http://127.0.0.1:{}/api/", port)
    }
}

async fn mock_handler(
    State(api): State<MockApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().trim_start_matches("/api/").to_string();
    let query: HashMap<String, String> = uri
        .query()
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();
    let day = query
        .get("start")
        .and_then(|s| s.get(..10))
        .map(str::to_string);

    api.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: path.clone(),
        query,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let delay = api
        .delays
        .lock()
        .unwrap()
        .get(&(path.clone(), day.clone()))
        .copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let routes = api.routes.lock().unwrap();
    let canned = routes
        .get(&(path.clone(), day))
        .or_else(|| routes.get(&(path, None)));

    match canned {
        Some((status, body)) => (
            *status,
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"message":"No canned response"}"#,
        )
            .into_response(),
    }
}

/// A test client that sends requests straight into the dashboard router.
pub struct TestClient {
    state: AppState,
    config: Config,
}

impl TestClient {
    /// Create a client talking to the analytics API at `api_url`.
    pub fn new(api_url: &str) -> Self {
        Self::with_config(Config {
            api_base_url: api_url.to_string(),
            api_timeout_secs: 5,
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let client = AnalyticsClient::from_config(&config).expect("Failed to create client");
        Self {
            state: AppState::new(config.clone(), client),
            config,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get the router for making requests (handlers only, no middleware).
    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    /// Get the full router with middleware applied (mimics production setup).
    pub fn full_router(&self) -> Router {
        let (_, app) = build_app(self.config.clone()).expect("Failed to build app");
        app
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        Self::send(self.router(), request).await
    }

    /// Make a GET request through the full middleware stack.
    pub async fn get_full(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        Self::send(self.full_router(), request).await
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Option<Value>) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).ok())
    }

    /// POST a JSON body and parse the JSON answer.
    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        Self::send(self.router(), request).await
    }
}

// =========================================================================
// Canned analytics API payloads
// =========================================================================

pub fn kpi_body(revenue: f64, orders: i64, customers: i64) -> Value {
    json!({
        "totalRevenue": revenue,
        "totalOrders": orders,
        "totalCustomers": customers,
        "averageOrderValue": if orders > 0 { revenue / orders as f64 } else { 0.0 },
        "newCustomersCount": 4,
        "totalProducts": 25
    })
}

pub fn customers_body(churn: f64, clv: f64) -> Value {
    json!({
        "segmentDistribution": { "CHAMPION": 2, "LOYAL": 1, "NEW": 1 },
        "topCustomers": [
            { "customerId": 1, "customerName": "alice Smith", "totalSpent": 1200.5, "orderCount": 12, "segment": "CHAMPION", "ltv": 1500.0 },
            { "customerId": 2, "customerName": "Bob Jones", "totalSpent": 300.0, "orderCount": 3, "segment": "NEW", "ltv": 2200.0 },
            { "customerId": 3, "customerName": "Carol White", "totalSpent": 0.0, "orderCount": 0, "segment": "AT_RISK", "ltv": 50.0 }
        ],
        "averageCustomerLifetimeValue": clv,
        "registrationTrends": [
            { "year": 2024, "month": 2, "registrationCount": 7 },
            { "year": 2023, "month": 12, "registrationCount": 3 },
            { "year": 2024, "month": 1, "registrationCount": 5 }
        ],
        "churnRate": churn
    })
}

pub fn products_body() -> Value {
    json!({
        "topSellingProducts": [
            { "productId": 1, "productName": "Laptop Pro", "quantitySold": 30, "revenue": 45000.0 }
        ],
        "categoryPerformance": [
            { "category": "LAPTOPS", "totalQuantitySold": 30, "totalRevenue": 45000.0, "productCount": 3, "averagePrice": 1500.0 },
            { "category": "ACCESSORIES", "totalQuantitySold": 10, "totalRevenue": 500.0, "productCount": 8, "averagePrice": 50.0 }
        ],
        "inventoryAnalysis": [
            { "productId": 1, "productName": "Laptop Pro", "currentStock": 3, "totalSold": 2, "turnoverRate": 0.66 },
            { "productId": 2, "productName": "USB Hub", "currentStock": 0, "totalSold": 9, "turnoverRate": null }
        ],
        "lowStockAlerts": [
            { "productId": 3, "sku": "SKU-3", "name": "Mouse", "category": "ACCESSORIES", "brand": "Acme", "price": 25.0, "stockQuantity": 8 },
            { "productId": 4, "sku": "SKU-4", "name": "Dock", "category": "ACCESSORIES", "brand": "Acme", "price": 120.0, "stockQuantity": 1 },
            { "productId": 5, "sku": "SKU-5", "name": "Cable", "category": "ACCESSORIES", "brand": null, "price": null, "stockQuantity": 4 }
        ]
    })
}

pub fn sales_body() -> Value {
    json!({
        "dailySales": [
            { "date": "2024-02-02", "revenue": 200.0, "orderCount": 2 },
            { "date": "2024-02-01", "revenue": 100.0, "orderCount": 1 }
        ],
        "monthlySales": [
            { "year": 2023, "month": 12, "revenue": 900.0, "orderCount": 9 },
            { "year": 2024, "month": 1, "revenue": 700.0, "orderCount": 7 },
            { "year": 2024, "month": 2, "revenue": 1200.0, "orderCount": 12 }
        ],
        "trendDirection": "UP"
    })
}

pub fn recommendations_body() -> Value {
    json!({
        "topRecommendedProducts": [
            { "productId": 1, "productName": "Laptop Pro", "recommendationCount": 3, "averageScore": 0.9 },
            { "productId": 2, "productName": "Mouse", "recommendationCount": 1, "averageScore": 0.5 },
            { "productId": 3, "productName": "Dock", "recommendationCount": 6, "averageScore": 0.7 }
        ],
        "totalCustomers": 42,
        "averageRecommendations": 2.5
    })
}

pub fn forecast_body() -> Value {
    json!({
        "success": true,
        "error": null,
        "bestModel": "Prophet",
        "modelMetrics": [
            { "modelName": "ARIMA", "trainMae": 10.0, "testMae": 12.0, "trainRmse": 20.0, "testRmse": 25.0 },
            { "modelName": "Prophet", "trainMae": 10.0, "testMae": 8.0, "trainRmse": 0.0, "testRmse": 5.0 }
        ],
        "forecastData": [
            { "date": "2024-03-01", "actualSales": 1000.0, "predictedSales": 1100.0, "confidenceLower": 900.0, "confidenceUpper": 1300.0 },
            { "date": "2024-03-02", "actualSales": null, "predictedSales": 1150.0, "confidenceLower": 950.0, "confidenceUpper": 1350.0 }
        ],
        "summary": {
            "totalDataPoints": 365,
            "forecastHorizonDays": 2,
            "averageConfidenceIntervalWidth": 400.0,
            "modelAccuracyScore": 0.92
        },
        "processingTimeMs": 120
    })
}
