use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::ForecastRequest;
use crate::services::forecast::{shape, ForecastView};
use crate::state::AppState;

fn default_forecast_days() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
pub struct ForecastForm {
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    pub client_id: Option<String>,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(form): Json<ForecastForm>,
) -> AppResult<Json<ForecastView>> {
    let request = ForecastRequest::new(form.forecast_days)?;
    info!(days = request.forecast_days, "Generating sales forecast");

    let client = state.client.clone();
    let response = state
        .panels
        .forecast
        .run(form.client_id.as_deref(), async move {
            client.generate_forecast(&request).await
        })
        .await?;

    debug!(
        points = response.forecast_data.len(),
        models = response.model_metrics.len(),
        best_model = response.best_model.as_deref().unwrap_or("-"),
        processing_time_ms = ?response.processing_time_ms,
        "Forecast received"
    );

    Ok(Json(shape(&response)))
}
