//! HTTP client for the analytics backend.
//!
//! Responses are decoded into the typed schemas in [`crate::models`] and
//! validated before they reach any derivation. A `401` clears the stored
//! bearer token.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::date_utils::{DateRange, WIRE_FORMAT};
use crate::error::{AppError, AppResult};
use crate::models::{
    CustomerAnalytics, ForecastRequest, ForecastResponse, KpiSummary, ProductsPerformance,
    RecommendationAnalytics, SalesAnalytics, Validate,
};

/// Bearer token shared by every clone of a client.
#[derive(Clone, Debug, Default)]
pub struct TokenStore(Arc<RwLock<Option<String>>>);

impl TokenStore {
    pub fn new(initial: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(initial)))
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().ok().and_then(|guard| guard.clone())
    }

    pub fn set(&self, token: String) {
        if let Ok(mut guard) = self.0.write() {
            *guard = Some(token);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.0.write() {
            *guard = None;
        }
    }
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// `/login` answers either with a bare token string or `{"token": "..."}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LoginResponse {
    Bare(String),
    Wrapped { token: String },
}

impl Validate for LoginResponse {}

#[derive(Clone, Debug)]
pub struct AnalyticsClient {
    http: Client,
    base_url: String,
    tokens: TokenStore,
}

impl AnalyticsClient {
    pub fn new(base_url: &str, timeout: Duration, tokens: TokenStore) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.api_timeout_secs),
            TokenStore::new(config.api_token.clone()),
        )
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.tokens.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T>(&self, builder: RequestBuilder, path: &str) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "Analytics API rejected the token, clearing it");
            self.tokens.clear();
            return Err(AppError::Unauthorized);
        }

        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        let parsed: T = serde_json::from_slice(&body)
            .map_err(|e| AppError::MalformedResponse(format!("{}: {}", path, e)))?;
        parsed.validate()?;
        Ok(parsed)
    }

    async fn get_range<T>(&self, path: &str, range: &DateRange, extra: &[(&str, String)]) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let mut query = vec![("start", range.start_param()), ("end", range.end_param())];
        query.extend(extra.iter().map(|(k, v)| (*k, v.clone())));

        debug!(path, start = %query[0].1, end = %query[1].1, "Fetching analytics");
        let builder = self.request(Method::GET, path).query(&query);
        self.send(builder, path).await
    }

    pub async fn kpi(&self, range: &DateRange) -> AppResult<KpiSummary> {
        self.get_range("analytics/kpi", range, &[]).await
    }

    pub async fn customer_analytics(
        &self,
        range: &DateRange,
        threshold: NaiveDateTime,
    ) -> AppResult<CustomerAnalytics> {
        let threshold = threshold.format(WIRE_FORMAT).to_string();
        self.get_range("analytics/customerAnalytics", range, &[("threshold", threshold)])
            .await
    }

    pub async fn products_performance(
        &self,
        range: &DateRange,
        low_stock_threshold: u32,
    ) -> AppResult<ProductsPerformance> {
        self.get_range(
            "analytics/productsPerformance",
            range,
            &[("threshold", low_stock_threshold.to_string())],
        )
        .await
    }

    pub async fn sales_analytics(&self, range: &DateRange) -> AppResult<SalesAnalytics> {
        self.get_range("analytics/salesAnalytics", range, &[]).await
    }

    pub async fn recommendations(&self) -> AppResult<RecommendationAnalytics> {
        let path = "analytics/recommendations";
        debug!(path, "Fetching analytics");
        self.send(self.request(Method::GET, path), path).await
    }

    pub async fn generate_forecast(&self, request: &ForecastRequest) -> AppResult<ForecastResponse> {
        let path = "forecasting/generate";
        debug!(path, days = request.forecast_days, "Requesting forecast");
        let builder = self.request(Method::POST, path).json(request);
        self.send(builder, path).await
    }

    /// Exchange credentials for a bearer token and keep it for later requests.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<()> {
        let path = "login";
        let builder = self
            .request(Method::POST, path)
            .json(&LoginRequest { username, password });

        let token = match self.send::<LoginResponse>(builder, path).await? {
            LoginResponse::Bare(token) | LoginResponse::Wrapped { token } => token,
        };
        if token.is_empty() {
            return Err(AppError::MalformedResponse("No token returned from server".into()));
        }

        self.tokens.set(token);
        Ok(())
    }
}

fn error_message(body: &[u8], status: StatusCode) -> String {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "An error occurred".to_string())
}
