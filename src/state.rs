use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::client::AnalyticsClient;
use crate::config::Config;
use crate::fetch::Superseding;
use crate::models::{
    CustomerAnalytics, ForecastResponse, ProductsPerformance, RecommendationAnalytics,
    SalesAnalytics,
};
use crate::services::kpi::KpiInputs;

/// One latest-wins fetch slot per dashboard panel.
pub struct PanelSlots {
    pub kpi: Superseding<KpiInputs>,
    pub customers: Superseding<CustomerAnalytics>,
    pub products: Superseding<ProductsPerformance>,
    pub sales: Superseding<SalesAnalytics>,
    pub recommendations: Superseding<RecommendationAnalytics>,
    pub forecast: Superseding<ForecastResponse>,
}

impl Default for PanelSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelSlots {
    pub fn new() -> Self {
        Self {
            kpi: Superseding::new("kpi"),
            customers: Superseding::new("customers"),
            products: Superseding::new("products"),
            sales: Superseding::new("sales"),
            recommendations: Superseding::new("recommendations"),
            forecast: Superseding::new("forecast"),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub client: AnalyticsClient,
    pub config: Arc<Config>,
    pub panels: Arc<PanelSlots>,
}

impl AppState {
    pub fn new(config: Config, client: AnalyticsClient) -> Self {
        Self {
            client,
            config: Arc::new(config),
            panels: Arc::new(PanelSlots::new()),
        }
    }

    /// Wall clock used to resolve presets.
    pub fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
