pub mod customers;
pub mod dashboard;
pub mod forecast;
pub mod kpi;
pub mod products;
pub mod recommendations;
pub mod sales;

use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::date_utils::{DateFilterable, DateRange};
use crate::error::AppResult;
use crate::sort_utils::Sortable;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(dashboard::index))
        // API (JSON for charts)
        .route("/api/dashboard/kpi", get(kpi::cards))
        .route("/api/dashboard/customers", get(customers::overview))
        .route("/api/dashboard/products", get(products::overview))
        .route("/api/dashboard/sales", get(sales::overview))
        .route(
            "/api/dashboard/recommendations",
            get(recommendations::overview),
        )
        .route("/api/dashboard/forecast", post(forecast::generate))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

/// Query parameters shared by the dashboard panels.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub preset: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    /// Low-stock threshold override for the products panel.
    pub threshold: Option<u32>,
    /// Browser tab issuing the request; a newer request from the same tab
    /// supersedes its in-flight fetch.
    pub client_id: Option<String>,
}

impl DateFilterable for DashboardParams {
    fn from_date(&self) -> Option<&String> {
        self.from_date.as_ref()
    }

    fn to_date(&self) -> Option<&String> {
        self.to_date.as_ref()
    }

    fn preset(&self) -> Option<&String> {
        self.preset.as_ref()
    }
}

impl Sortable for DashboardParams {
    fn sort_by(&self) -> Option<&String> {
        self.sort.as_ref()
    }

    fn sort_dir(&self) -> Option<&String> {
        self.dir.as_ref()
    }
}

/// Resolved period echoed back with every panel so the UI can label it.
#[derive(Debug, Clone, Serialize)]
pub struct RangeView {
    pub preset: Option<&'static str>,
    pub label: String,
    pub start: String,
    pub end: String,
    pub previous_start: String,
    pub previous_end: String,
}

impl RangeView {
    pub fn new(range: &DateRange) -> AppResult<Self> {
        let previous = range.previous_period()?;
        Ok(Self {
            preset: range.preset.map(|p| p.as_str()),
            label: range.display_label(),
            start: range.start_param(),
            end: range.end_param(),
            previous_start: previous.start_param(),
            previous_end: previous.end_param(),
        })
    }
}
