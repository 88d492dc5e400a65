//! Typed schemas for the analytics API responses.
//!
//! Every response is parsed into these structs at the fetch boundary and then
//! checked with [`Validate`], so derivations never see missing or out-of-range
//! fields.

pub mod customer;
pub mod forecast;
pub mod kpi;
pub mod product;
pub mod recommendation;
pub mod sales;

pub use customer::{CustomerAnalytics, RegistrationTrend, TopCustomer};
pub use forecast::{ForecastPoint, ForecastRequest, ForecastResponse, ForecastSummary, ModelMetrics};
pub use kpi::KpiSummary;
pub use product::{CategoryPerformance, InventoryTurnover, LowStockProduct, ProductsPerformance, TopProduct};
pub use recommendation::{RecommendationAnalytics, RecommendedProduct};
pub use sales::{DailySales, MonthlySales, SalesAnalytics};

use crate::error::{AppError, AppResult};

/// Semantic checks that serde alone cannot express.
pub trait Validate {
    fn validate(&self) -> AppResult<()> {
        Ok(())
    }
}

pub(crate) fn check_month(context: &str, year: i32, month: u32) -> AppResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(AppError::MalformedResponse(format!(
            "{} has invalid month {} for year {}",
            context, month, year
        )))
    }
}
