use serde::Serialize;

use crate::models::RecommendationAnalytics;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecommendationKpis {
    pub total_customers: i64,
    pub average_recommendations: f64,
    /// Average score weighted by how often each product was recommended.
    pub average_score: f64,
}

pub fn summarize(data: &RecommendationAnalytics) -> RecommendationKpis {
    let (weighted, count) = data
        .top_recommended_products
        .iter()
        .fold((0.0, 0i64), |(w, n), p| {
            (w + p.recommendation_count as f64 * p.average_score, n + p.recommendation_count)
        });

    RecommendationKpis {
        total_customers: data.total_customers,
        average_recommendations: data.average_recommendations,
        average_score: if count > 0 { weighted / count as f64 } else { 0.0 },
    }
}
