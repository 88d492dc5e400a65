use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use tracing::{debug, warn};

use super::{kpi, sales, DashboardParams};
use crate::date_utils::{resolve, DateFilterable, DatePreset, DateRange};
use crate::error::{AppError, AppResult, RenderHtml};
use crate::services::charts::MONTH_NAMES;
use crate::services::heatmap::{derive_grid, HeatmapGrid};
use crate::services::kpi::{compose_cards, KpiCard};
use crate::state::AppState;
use crate::VERSION;

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub version: &'static str,
    pub range: DateRange,
    pub presets: &'static [DatePreset],
    pub range_error: Option<String>,
    pub cards: Vec<KpiCard>,
    pub kpi_error: Option<String>,
    pub heatmap: HeatmapGrid,
    pub sales_error: Option<String>,
    pub month_names: &'static [&'static str],
}

/// Message shown in a panel whose fetch failed.
fn panel_error(panel: &str, err: &AppError) -> String {
    warn!(panel, "Dashboard panel failed: {}", err);
    match err {
        AppError::Unauthorized => "Your session has expired. Please sign in again.".into(),
        AppError::Http(_) => "Failed to reach the analytics API".into(),
        other => other.to_string(),
    }
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Html<String>> {
    debug!("Loading dashboard");
    let now = state.now();

    let (range, range_error) = match params.resolve_date_range(now) {
        Ok(range) => (range, None),
        Err(e) => {
            let fallback = resolve(DatePreset::default(), now)
                .ok_or_else(|| AppError::Internal("Default preset has no range".into()))?;
            (fallback, Some(e.to_string()))
        }
    };

    let (kpi_inputs, sales_data) = tokio::join!(
        kpi::load_inputs(&state, params.client_id.as_deref(), &range),
        sales::load(&state, params.client_id.as_deref(), &range)
    );

    let (cards, kpi_error) = match kpi_inputs {
        Ok(inputs) => (compose_cards(&inputs), None),
        Err(e) => (Vec::new(), Some(panel_error("kpi", &e))),
    };

    let (heatmap, sales_error) = match sales_data {
        Ok(sales) => (derive_grid(&sales.monthly_sales), None),
        Err(e) => (HeatmapGrid::default(), Some(panel_error("sales", &e))),
    };

    debug!(
        cards = cards.len(),
        heatmap_years = heatmap.years.len(),
        kpi_failed = kpi_error.is_some(),
        sales_failed = sales_error.is_some(),
        "Dashboard data loaded"
    );

    let template = DashboardTemplate {
        title: "Dashboard".into(),
        version: VERSION,
        range,
        presets: DatePreset::all(),
        range_error,
        cards,
        kpi_error,
        heatmap,
        sales_error,
        month_names: &MONTH_NAMES,
    };

    template.render_html()
}
