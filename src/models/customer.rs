use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{check_month, Validate};
use crate::error::AppResult;

/// Response of `GET /analytics/customerAnalytics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAnalytics {
    /// Segment label (CHAMPION, LOYAL, NEW, AT_RISK, ...) to customer count.
    pub segment_distribution: BTreeMap<String, i64>,
    pub top_customers: Vec<TopCustomer>,
    pub average_customer_lifetime_value: Option<f64>,
    pub registration_trends: Vec<RegistrationTrend>,
    pub churn_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub customer_id: i64,
    pub customer_name: String,
    pub total_spent: Option<f64>,
    pub order_count: Option<i64>,
    pub segment: Option<String>,
    pub ltv: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationTrend {
    pub year: i32,
    pub month: u32,
    pub registration_count: i64,
}

impl Validate for CustomerAnalytics {
    fn validate(&self) -> AppResult<()> {
        self.registration_trends
            .iter()
            .try_for_each(|t| check_month("registrationTrends", t.year, t.month))
    }
}
