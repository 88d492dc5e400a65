use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default backend base path, matching the analytics service's dev profile.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub api_timeout_secs: u64,
    pub static_path: PathBuf,
    /// Stock level at or below which a product counts as low stock.
    pub low_stock_threshold: u32,
    /// Customer analytics threshold used by the customer screen (now minus N days).
    pub customer_threshold_days: i64,
    /// Customer analytics threshold used by the KPI screen (now minus N days).
    pub kpi_threshold_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 7080,
            api_base_url: DEFAULT_API_URL.into(),
            api_token: None,
            api_timeout_secs: 10,
            static_path: PathBuf::from("static"),
            low_stock_threshold: 10,
            customer_threshold_days: 30,
            kpi_threshold_days: 7,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env::var("ECOMDASH_HOST").unwrap_or(defaults.host),
            port: parse_var("ECOMDASH_PORT").unwrap_or(defaults.port),
            api_base_url: env::var("ECOMDASH_API_URL").unwrap_or(defaults.api_base_url),
            api_token: env::var("ECOMDASH_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            api_timeout_secs: parse_var("ECOMDASH_API_TIMEOUT_SECS")
                .unwrap_or(defaults.api_timeout_secs),
            static_path: env::var("ECOMDASH_STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_path),
            low_stock_threshold: parse_var("ECOMDASH_LOW_STOCK_THRESHOLD")
                .unwrap_or(defaults.low_stock_threshold),
            customer_threshold_days: parse_var("ECOMDASH_CUSTOMER_THRESHOLD_DAYS")
                .unwrap_or(defaults.customer_threshold_days),
            kpi_threshold_days: parse_var("ECOMDASH_KPI_THRESHOLD_DAYS")
                .unwrap_or(defaults.kpi_threshold_days),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {:?}", name, value);
            None
        }
    }
}
