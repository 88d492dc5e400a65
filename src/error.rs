use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

/// Newtype for passing error messages through response extensions.
#[derive(Clone, Debug)]
pub struct ErrorMessage(pub String);

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analytics API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Not authorized against the analytics API")]
    Unauthorized,

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request superseded by a newer one")]
    Superseded,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRange(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Superseded => StatusCode::CONFLICT,
            AppError::Http(_) | AppError::Upstream { .. } | AppError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::InvalidRange(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized | AppError::Superseded => self.to_string(),
            AppError::Http(e) => {
                tracing::error!("Analytics API unreachable: {:?}", e);
                "Failed to reach the analytics API".to_string()
            }
            AppError::Upstream { status, message } => {
                tracing::error!(status, "Analytics API error: {}", message);
                message.clone()
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed analytics response: {}", msg);
                "Unexpected response from the analytics API".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                msg.clone()
            }
        };

        let html = format!(
            r#"<div class="error-panel" role="alert">
                <p class="error-message">Error: {}</p>
                <button type="button" class="retry" onclick="window.location.reload()">Retry</button>
            </div>"#,
            html_escape(&message)
        );

        let mut response = (status, Html(html)).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub type AppResult<T> = Result<T, AppError>;

pub trait RenderHtml {
    fn render_html(self) -> AppResult<Html<String>>;
}

impl<T: Template> RenderHtml for T {
    fn render_html(self) -> AppResult<Html<String>> {
        self.render()
            .map(Html)
            .map_err(|e| AppError::Internal(format!("Template error: {}", e)))
    }
}
