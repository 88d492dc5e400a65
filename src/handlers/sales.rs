use axum::extract::{Query, State};
use axum::response::Json;
use serde::Serialize;
use tracing::debug;

use super::{DashboardParams, RangeView};
use crate::date_utils::{DateFilterable, DateRange};
use crate::error::AppResult;
use crate::models::SalesAnalytics;
use crate::services::charts::{daily_series, monthly_revenue_bars, DailyPoint, MonthlyBar};
use crate::services::heatmap::{derive_grid, HeatmapGrid};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SalesResponse {
    pub range: RangeView,
    pub monthly: Vec<MonthlyBar>,
    pub heatmap: HeatmapGrid,
    pub daily: Vec<DailyPoint>,
    /// Overall direction as reported by the backend.
    pub trend_direction: Option<String>,
}

/// Fetch sales analytics through the sales panel slot.
pub async fn load(
    state: &AppState,
    client_id: Option<&str>,
    range: &DateRange,
) -> AppResult<SalesAnalytics> {
    let client = state.client.clone();
    let range = range.clone();
    state
        .panels
        .sales
        .run(client_id, async move { client.sales_analytics(&range).await })
        .await
}

pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<SalesResponse>> {
    let range = params.resolve_date_range(state.now())?;
    let sales = load(&state, params.client_id.as_deref(), &range).await?;

    let heatmap = derive_grid(&sales.monthly_sales);
    debug!(
        days = sales.daily_sales.len(),
        months = sales.monthly_sales.len(),
        years = heatmap.years.len(),
        "Sales analytics loaded"
    );

    Ok(Json(SalesResponse {
        range: RangeView::new(&range)?,
        monthly: monthly_revenue_bars(&sales.monthly_sales),
        daily: daily_series(&sales.daily_sales),
        trend_direction: sales.trend_direction,
        heatmap,
    }))
}
