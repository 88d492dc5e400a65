use askama::Template;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};

use crate::error::ErrorMessage;
use crate::VERSION;

#[derive(Template)]
#[template(path = "pages/error.html")]
struct ErrorPageTemplate {
    title: String,
    version: &'static str,
    status_code: u16,
    status_text: &'static str,
    message: String,
}

impl ErrorPageTemplate {
    fn for_response(status: StatusCode, response: &Response) -> Self {
        let (status_text, hint) = describe(status);
        let message = match response.extensions().get::<ErrorMessage>() {
            Some(ErrorMessage(msg)) => msg.clone(),
            None if hint.is_empty() => {
                format!("An unexpected error occurred ({}).", status.as_u16())
            }
            None => hint.to_string(),
        };

        Self {
            title: status_text.to_string(),
            version: VERSION,
            status_code: status.as_u16(),
            status_text,
            message,
        }
    }
}

/// Logs failed requests and swaps 4xx/5xx page responses for the full
/// error page.
///
/// Dashboard API calls and `/health` pass through untouched: panels embed
/// the error fragment those return.
pub async fn error_page_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let passthrough = path.starts_with("/api/") || path == "/health";

    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let message = response
        .extensions()
        .get::<ErrorMessage>()
        .map(|e| e.0.as_str())
        .unwrap_or("");
    tracing::warn!(%status, %method, %path, message, "request failed");

    if passthrough {
        response
    } else {
        render(status, &response)
    }
}

/// Unmatched routes.
pub async fn fallback_handler() -> Response {
    let mut response = StatusCode::NOT_FOUND.into_response();
    response
        .extensions_mut()
        .insert(ErrorMessage(describe(StatusCode::NOT_FOUND).1.into()));
    response
}

fn render(status: StatusCode, response: &Response) -> Response {
    match ErrorPageTemplate::for_response(status, response).render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, "Internal Server Error").into_response()
        }
    }
}

/// Title and default message per status.
fn describe(status: StatusCode) -> (&'static str, &'static str) {
    match status {
        StatusCode::BAD_REQUEST => ("Bad Request", "The request could not be understood."),
        StatusCode::UNAUTHORIZED => ("Unauthorized", "The analytics API rejected our credentials."),
        StatusCode::NOT_FOUND => ("Not Found", "The page you're looking for doesn't exist."),
        StatusCode::METHOD_NOT_ALLOWED => ("Method Not Allowed", "This action is not supported."),
        StatusCode::CONFLICT => ("Conflict", "A newer request replaced this one."),
        StatusCode::INTERNAL_SERVER_ERROR => ("Internal Server Error", "Something went wrong on our end."),
        StatusCode::BAD_GATEWAY => ("Bad Gateway", "The analytics API did not answer properly."),
        _ => ("Error", ""),
    }
}
