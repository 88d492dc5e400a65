use axum::extract::{Query, State};
use axum::response::Json;
use serde::Serialize;
use tracing::debug;

use super::{DashboardParams, RangeView};
use crate::date_utils::{days_ago_start, DateFilterable};
use crate::error::AppResult;
use crate::models::TopCustomer;
use crate::services::charts::{
    bubble_points, registration_trend, segment_slices, BubblePoint, RegistrationPoint, ShareSlice,
};
use crate::sort_utils::{
    sort_rows, SortDirection, SortState, Sortable, SortValue, SortableColumn, SortableRow,
};
use crate::state::AppState;

/// Sortable columns for the top customers table.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum CustomerSortColumn {
    CustomerName,
    TotalSpent,
    OrderCount,
    #[default]
    Ltv,
}

impl SortableColumn for CustomerSortColumn {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customername" => Some(Self::CustomerName),
            "totalspent" => Some(Self::TotalSpent),
            "ordercount" => Some(Self::OrderCount),
            "ltv" => Some(Self::Ltv),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::CustomerName => "customerName",
            Self::TotalSpent => "totalSpent",
            Self::OrderCount => "orderCount",
            Self::Ltv => "ltv",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::CustomerName, Self::TotalSpent, Self::OrderCount, Self::Ltv]
    }

    fn default_direction() -> SortDirection {
        SortDirection::Desc
    }
}

impl SortableRow<CustomerSortColumn> for TopCustomer {
    fn sort_value(&self, column: &CustomerSortColumn) -> SortValue<'_> {
        match column {
            CustomerSortColumn::CustomerName => self.customer_name.as_str().into(),
            CustomerSortColumn::TotalSpent => self.total_spent.into(),
            CustomerSortColumn::OrderCount => self.order_count.map(|n| n as f64).into(),
            CustomerSortColumn::Ltv => self.ltv.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomersResponse {
    pub range: RangeView,
    pub sort: SortState,
    pub top_customers: Vec<TopCustomer>,
    pub bubbles: Vec<BubblePoint>,
    pub segments: Vec<ShareSlice>,
    pub registrations: Vec<RegistrationPoint>,
    pub churn_rate: Option<f64>,
    pub average_lifetime_value: Option<f64>,
}

pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<CustomersResponse>> {
    let range = params.resolve_date_range(state.now())?;
    let sort = params.resolve_sort::<CustomerSortColumn>();
    let threshold = days_ago_start(state.now(), state.config.customer_threshold_days);

    let client = state.client.clone();
    let fetch_range = range.clone();
    let analytics = state
        .panels
        .customers
        .run(params.client_id.as_deref(), async move {
            client.customer_analytics(&fetch_range, threshold).await
        })
        .await?;

    let mut top_customers = analytics.top_customers.clone();
    sort_rows(&mut top_customers, &sort);

    debug!(
        customers = top_customers.len(),
        segments = analytics.segment_distribution.len(),
        "Customer analytics loaded"
    );

    Ok(Json(CustomersResponse {
        range: RangeView::new(&range)?,
        sort: SortState::from(&sort),
        bubbles: bubble_points(&analytics.top_customers),
        segments: segment_slices(&analytics.segment_distribution),
        registrations: registration_trend(&analytics.registration_trends),
        churn_rate: analytics.churn_rate,
        average_lifetime_value: analytics.average_customer_lifetime_value,
        top_customers,
    }))
}
