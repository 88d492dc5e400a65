use axum::extract::{Query, State};
use axum::response::Json;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, warn};

use super::{DashboardParams, RangeView};
use crate::client::AnalyticsClient;
use crate::date_utils::{days_ago_start, DateFilterable, DateRange};
use crate::error::AppResult;
use crate::services::kpi::{compose_cards, KpiCard, KpiInputs};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KpiResponse {
    pub range: RangeView,
    pub cards: Vec<KpiCard>,
}

/// Keep a secondary fetch result, or log and drop it.
fn secondary<T>(what: &str, result: AppResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} unavailable, continuing without it: {}", what, e);
            None
        }
    }
}

/// Fetch current and previous period KPIs and customer analytics concurrently.
///
/// Only the current KPI summary is required; the rest degrade to `None`.
pub async fn fetch_inputs(
    client: AnalyticsClient,
    range: DateRange,
    threshold: NaiveDateTime,
) -> AppResult<KpiInputs> {
    let previous_range = range.previous_period()?;

    let (current, previous, customers, previous_customers) = tokio::join!(
        client.kpi(&range),
        client.kpi(&previous_range),
        client.customer_analytics(&range, threshold),
        client.customer_analytics(&previous_range, threshold),
    );

    Ok(KpiInputs {
        current: current?,
        previous: secondary("Previous period KPIs", previous),
        customers: secondary("Customer analytics", customers),
        previous_customers: secondary("Previous period customer analytics", previous_customers),
    })
}

/// Run the KPI fetch plan through the KPI panel slot.
pub async fn load_inputs(
    state: &AppState,
    client_id: Option<&str>,
    range: &DateRange,
) -> AppResult<KpiInputs> {
    let threshold = days_ago_start(state.now(), state.config.kpi_threshold_days);
    let fetch = fetch_inputs(state.client.clone(), range.clone(), threshold);
    state.panels.kpi.run(client_id, fetch).await
}

pub async fn cards(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<KpiResponse>> {
    let range = params.resolve_date_range(state.now())?;
    debug!(start = %range.start_param(), end = %range.end_param(), "Loading KPI cards");

    let inputs = load_inputs(&state, params.client_id.as_deref(), &range).await?;

    Ok(Json(KpiResponse {
        range: RangeView::new(&range)?,
        cards: compose_cards(&inputs),
    }))
}
