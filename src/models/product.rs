use serde::{Deserialize, Serialize};

use super::Validate;

/// Response of `GET /analytics/productsPerformance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsPerformance {
    #[serde(default)]
    pub top_selling_products: Vec<TopProduct>,
    pub category_performance: Vec<CategoryPerformance>,
    pub inventory_analysis: Vec<InventoryTurnover>,
    pub low_stock_alerts: Vec<LowStockProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: i64,
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPerformance {
    pub category: String,
    pub total_quantity_sold: i64,
    pub total_revenue: f64,
    pub product_count: i64,
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTurnover {
    pub product_id: i64,
    pub product_name: String,
    pub current_stock: i64,
    pub total_sold: i64,
    pub turnover_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub product_id: i64,
    pub sku: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: i64,
}

impl Validate for ProductsPerformance {}
