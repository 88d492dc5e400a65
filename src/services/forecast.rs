//! Shape a forecast response for the confidence-band chart and model cards.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::charts::month_short;
use super::trend::{round_to, TrendDirection};
use crate::models::{ForecastResponse, ForecastSummary, ModelMetrics};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastChartPoint {
    pub date: String,
    /// Short axis label such as "Mar 5".
    pub label: String,
    pub actual: Option<f64>,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Train-to-test change of one error metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Improvement {
    pub direction: TrendDirection,
    pub magnitude_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCard {
    pub model_name: String,
    pub test_mae: f64,
    pub test_rmse: f64,
    pub mae_improvement: Option<Improvement>,
    pub rmse_improvement: Option<Improvement>,
    pub is_best: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub points: Vec<ForecastChartPoint>,
    pub models: Vec<ModelCard>,
    pub best_model: Option<String>,
    pub summary: Option<ForecastSummary>,
    pub processing_time_ms: Option<i64>,
}

/// "Mon D" for an ISO date or datetime string; the raw string if it does not parse.
pub fn short_date_label(date: &str) -> String {
    let parsed = date
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    match parsed.and_then(|d| month_short(d.month()).map(|m| (m, d.day()))) {
        Some((month, day)) => format!("{} {}", month, day),
        None => date.to_string(),
    }
}

/// `(train - test) / train` as a percentage. Undefined for a zero train error.
pub fn improvement(train: f64, test: f64) -> Option<Improvement> {
    if train == 0.0 || !train.is_finite() || !test.is_finite() {
        return None;
    }
    let pct = (train - test) / train * 100.0;
    Some(Improvement {
        direction: if pct > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        },
        magnitude_percent: round_to(pct.abs(), 1),
    })
}

fn model_card(metrics: &ModelMetrics, best: Option<&str>) -> ModelCard {
    ModelCard {
        model_name: metrics.model_name.clone(),
        test_mae: metrics.test_mae,
        test_rmse: metrics.test_rmse,
        mae_improvement: improvement(metrics.train_mae, metrics.test_mae),
        rmse_improvement: improvement(metrics.train_rmse, metrics.test_rmse),
        is_best: best == Some(metrics.model_name.as_str()),
    }
}

pub fn shape(response: &ForecastResponse) -> ForecastView {
    let best = response.best_model.as_deref();

    ForecastView {
        points: response
            .forecast_data
            .iter()
            .map(|p| ForecastChartPoint {
                label: short_date_label(&p.date),
                date: p.date.clone(),
                actual: p.actual_sales,
                predicted: p.predicted_sales,
                lower: p.confidence_lower,
                upper: p.confidence_upper,
            })
            .collect(),
        models: response
            .model_metrics
            .iter()
            .map(|m| model_card(m, best))
            .collect(),
        best_model: response.best_model.clone(),
        summary: response.summary.clone(),
        processing_time_ms: response.processing_time_ms,
    }
}
