use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{check_month, Validate};
use crate::error::AppResult;

/// Response of `GET /analytics/salesAnalytics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    pub daily_sales: Vec<DailySales>,
    pub monthly_sales: Vec<MonthlySales>,
    pub trend_direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub revenue: f64,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
    pub order_count: i64,
}

impl Validate for SalesAnalytics {
    fn validate(&self) -> AppResult<()> {
        self.monthly_sales
            .iter()
            .try_for_each(|m| check_month("monthlySales", m.year, m.month))
    }
}
