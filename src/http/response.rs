//! Response rendering.
//!
//! # Responsibilities
//! - Turn a handler chain's final value into a response body
//! - Set the content type of the selected render strategy
//! - Tag responses with the matched route for metrics
//!
//! # Design Decisions
//! - String rendering writes JSON strings unquoted, everything else as JSON text
//! - Rendering is infallible; errors are answered before this point

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::sitemap::Render;

/// Template of the route that produced a response, attached as a response
/// extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute(pub String);

/// Render `value` with `render`, answering 200.
pub fn render(value: Value, render: Render) -> Response {
    let (content_type, body) = match render {
        Render::Html => ("text/html; charset=utf-8", render_string(value)),
        Render::Text => ("text/plain; charset=utf-8", render_string(value)),
        Render::Json => ("application/json", value.to_string()),
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
        body,
    )
        .into_response()
}

fn render_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
