//! Request-time error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Opaque failure raised by handler code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Structured HTTP error returned by handlers to end the chain with a
/// specific status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Error returned by a handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Sanctioned domain failure, answered with its own status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Anything else. Not converted into a response by the dispatcher.
    #[error("handler failed: {0}")]
    Failed(#[source] BoxError),
}

impl HandlerError {
    pub fn failed(err: impl Into<BoxError>) -> Self {
        HandlerError::Failed(err.into())
    }
}

/// Outcome of dispatching a request that did not produce a value.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route matched, or the sitemap walk could not follow the matched route.
    #[error("no route for `{path}`")]
    NotFound { path: String },

    /// The request path does not percent-decode to UTF-8.
    #[error("request path `{path}` is not valid UTF-8 once decoded")]
    InvalidPath { path: String },

    /// A path parameter failed coercion.
    #[error("invalid value `{value}` for path parameter `{name}`: {reason}")]
    BadParameter {
        name: String,
        value: String,
        reason: String,
    },

    /// A handler ended the chain with a structured error.
    #[error(transparent)]
    Handler(HttpError),

    /// A handler failed in an unstructured way.
    #[error("handler `{handler}` failed: {source}")]
    Internal {
        handler: String,
        #[source]
        source: BoxError,
    },
}

impl DispatchError {
    /// Status answered for this error, `None` for internal failures which
    /// are left to the server boundary.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DispatchError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            DispatchError::InvalidPath { .. } | DispatchError::BadParameter { .. } => {
                Some(StatusCode::BAD_REQUEST)
            }
            DispatchError::Handler(err) => Some(err.status),
            DispatchError::Internal { .. } => None,
        }
    }
}
