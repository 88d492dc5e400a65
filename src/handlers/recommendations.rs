use axum::extract::{Query, State};
use axum::response::Json;
use serde::Serialize;
use tracing::debug;

use super::DashboardParams;
use crate::error::AppResult;
use crate::filters::format_fixed;
use crate::models::RecommendedProduct;
use crate::services::recommendations::{summarize, RecommendationKpis};
use crate::sort_utils::{
    sort_rows, SortDirection, SortState, Sortable, SortValue, SortableColumn, SortableRow,
};
use crate::state::AppState;

/// Sortable columns for the recommended products table.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum RecommendationSortColumn {
    ProductName,
    #[default]
    RecommendationCount,
    AverageScore,
}

impl SortableColumn for RecommendationSortColumn {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "productname" => Some(Self::ProductName),
            "recommendationcount" => Some(Self::RecommendationCount),
            "averagescore" => Some(Self::AverageScore),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::ProductName => "productName",
            Self::RecommendationCount => "recommendationCount",
            Self::AverageScore => "averageScore",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::ProductName,
            Self::RecommendationCount,
            Self::AverageScore,
        ]
    }

    fn default_direction() -> SortDirection {
        SortDirection::Desc
    }
}

impl SortableRow<RecommendationSortColumn> for RecommendedProduct {
    fn sort_value(&self, column: &RecommendationSortColumn) -> SortValue<'_> {
        match column {
            RecommendationSortColumn::ProductName => self.product_name.as_str().into(),
            RecommendationSortColumn::RecommendationCount => self.recommendation_count.into(),
            RecommendationSortColumn::AverageScore => self.average_score.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationRow {
    #[serde(flatten)]
    pub product: RecommendedProduct,
    pub formatted_score: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub sort: SortState,
    pub kpis: RecommendationKpis,
    pub products: Vec<RecommendationRow>,
}

pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<RecommendationsResponse>> {
    let sort = params.resolve_sort::<RecommendationSortColumn>();

    let client = state.client.clone();
    let data = state
        .panels
        .recommendations
        .run(params.client_id.as_deref(), async move { client.recommendations().await })
        .await?;

    let kpis = summarize(&data);
    let mut products = data.top_recommended_products;
    sort_rows(&mut products, &sort);

    debug!(products = products.len(), "Recommendations loaded");

    Ok(Json(RecommendationsResponse {
        sort: SortState::from(&sort),
        kpis,
        products: products
            .into_iter()
            .map(|product| RecommendationRow {
                formatted_score: format_fixed(product.average_score, 3),
                product,
            })
            .collect(),
    }))
}
