use serde::{Deserialize, Serialize};

use super::Validate;

/// Aggregates from `GET /analytics/kpi`.
///
/// Every metric is nullable on the wire; a missing metric is treated like an
/// absent sample by the trend calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_revenue: Option<f64>,
    pub total_orders: Option<i64>,
    pub total_customers: Option<i64>,
    pub average_order_value: Option<f64>,
    pub new_customers_count: Option<i64>,
    pub total_products: Option<i64>,
}

impl Validate for KpiSummary {}
