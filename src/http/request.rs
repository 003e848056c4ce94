//! Request context handed to sitemap handlers.
//!
//! # Responsibilities
//! - Carry the request method, URI, headers and buffered body
//! - Carry the request ID assigned by the server layers
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (tower-http layer)
//! - Body buffered before dispatch so handlers stay synchronous

use axum::body::Bytes;
use axum::http::{request::Parts, HeaderMap, HeaderName, Method, Uri};

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// The request as seen by handlers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub request_id: String,
}

impl RequestContext {
    /// Build from request parts and a buffered body.
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        let request_id = parts
            .headers
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            request_id,
        }
    }

    /// Context for a bodiless GET of `path`.
    pub fn for_path(path: &str) -> Self {
        Self {
            method: Method::GET,
            uri: path.parse().unwrap_or_default(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }
}
