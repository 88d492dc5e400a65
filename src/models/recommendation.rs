use serde::{Deserialize, Serialize};

use super::Validate;

/// Response of `GET /analytics/recommendations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationAnalytics {
    pub top_recommended_products: Vec<RecommendedProduct>,
    pub total_customers: i64,
    pub average_recommendations: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub product_id: i64,
    pub product_name: String,
    pub recommendation_count: i64,
    pub average_score: f64,
}

impl Validate for RecommendationAnalytics {}
