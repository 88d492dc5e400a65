use serde::{Deserialize, Serialize};

use super::Validate;
use crate::error::{AppError, AppResult};

/// Body of `POST /forecasting/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub forecast_days: u32,
    pub include_confidence_intervals: bool,
    pub model_comparison: bool,
}

impl ForecastRequest {
    pub const MAX_DAYS: u32 = 365;

    /// The dashboard always asks for intervals and a model comparison.
    pub fn new(forecast_days: u32) -> AppResult<Self> {
        if forecast_days == 0 || forecast_days > Self::MAX_DAYS {
            return Err(AppError::Validation(format!(
                "Forecast days must be between 1 and {}",
                Self::MAX_DAYS
            )));
        }
        Ok(Self {
            forecast_days,
            include_confidence_intervals: true,
            model_comparison: true,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub success: bool,
    pub error: Option<String>,
    pub best_model: Option<String>,
    #[serde(default)]
    pub model_metrics: Vec<ModelMetrics>,
    pub forecast_data: Vec<ForecastPoint>,
    pub summary: Option<ForecastSummary>,
    pub processing_time_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: String,
    /// Only present for dates that already have recorded sales.
    pub actual_sales: Option<f64>,
    pub predicted_sales: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub total_data_points: i64,
    pub forecast_horizon_days: i64,
    pub average_confidence_interval_width: f64,
    pub model_accuracy_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub model_name: String,
    pub train_mae: f64,
    pub test_mae: f64,
    pub train_rmse: f64,
    pub test_rmse: f64,
}

impl Validate for ForecastResponse {
    fn validate(&self) -> AppResult<()> {
        if !self.success {
            return Err(AppError::Upstream {
                status: 200,
                message: self
                    .error
                    .clone()
                    .unwrap_or_else(|| "Forecast generation failed".into()),
            });
        }
        Ok(())
    }
}
