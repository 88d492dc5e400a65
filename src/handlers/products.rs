use axum::extract::{Query, State};
use axum::response::Json;
use serde::Serialize;
use tracing::debug;

use super::{DashboardParams, RangeView};
use crate::date_utils::DateFilterable;
use crate::error::AppResult;
use crate::models::{LowStockProduct, TopProduct};
use crate::services::charts::{
    category_performance_bars, category_slices, turnover_bars, CategoryBar, ShareSlice,
    TurnoverBar,
};
use crate::sort_utils::{
    sort_rows, SortDirection, SortState, Sortable, SortValue, SortableColumn, SortableRow,
};
use crate::state::AppState;

/// Sortable columns for the low stock table.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum ProductSortColumn {
    Name,
    Sku,
    Category,
    Brand,
    Price,
    #[default]
    StockQuantity,
}

impl SortableColumn for ProductSortColumn {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "sku" => Some(Self::Sku),
            "category" => Some(Self::Category),
            "brand" => Some(Self::Brand),
            "price" => Some(Self::Price),
            "stockquantity" => Some(Self::StockQuantity),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Sku => "sku",
            Self::Category => "category",
            Self::Brand => "brand",
            Self::Price => "price",
            Self::StockQuantity => "stockQuantity",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Name,
            Self::Sku,
            Self::Category,
            Self::Brand,
            Self::Price,
            Self::StockQuantity,
        ]
    }

    // most urgent restock first
    fn default_direction() -> SortDirection {
        SortDirection::Asc
    }
}

impl SortableRow<ProductSortColumn> for LowStockProduct {
    fn sort_value(&self, column: &ProductSortColumn) -> SortValue<'_> {
        match column {
            ProductSortColumn::Name => self.name.as_str().into(),
            ProductSortColumn::Sku => self.sku.as_deref().into(),
            ProductSortColumn::Category => self.category.as_deref().into(),
            ProductSortColumn::Brand => self.brand.as_deref().into(),
            ProductSortColumn::Price => self.price.into(),
            ProductSortColumn::StockQuantity => self.stock_quantity.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub range: RangeView,
    pub sort: SortState,
    pub threshold: u32,
    pub top_selling: Vec<TopProduct>,
    pub category_share: Vec<ShareSlice>,
    pub category_performance: Vec<CategoryBar>,
    pub turnover: Vec<TurnoverBar>,
    pub low_stock: Vec<LowStockProduct>,
}

pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<ProductsResponse>> {
    let range = params.resolve_date_range(state.now())?;
    let sort = params.resolve_sort::<ProductSortColumn>();
    let threshold = params.threshold.unwrap_or(state.config.low_stock_threshold);

    let client = state.client.clone();
    let fetch_range = range.clone();
    let performance = state
        .panels
        .products
        .run(params.client_id.as_deref(), async move {
            client.products_performance(&fetch_range, threshold).await
        })
        .await?;

    let mut low_stock = performance.low_stock_alerts.clone();
    sort_rows(&mut low_stock, &sort);

    let turnover = turnover_bars(&performance.inventory_analysis);
    debug!(
        low_stock = low_stock.len(),
        turnover = turnover.len(),
        skipped = performance.inventory_analysis.len() - turnover.len(),
        "Product performance loaded"
    );

    Ok(Json(ProductsResponse {
        range: RangeView::new(&range)?,
        sort: SortState::from(&sort),
        threshold,
        top_selling: performance.top_selling_products.clone(),
        category_share: category_slices(&performance.category_performance),
        category_performance: category_performance_bars(&performance.category_performance),
        turnover,
        low_stock,
    }))
}
