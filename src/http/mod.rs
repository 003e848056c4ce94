//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tower-http layers, request ID)
//!     → request.rs (buffer body, build RequestContext)
//!     → routing::SitemapRouter (match, dispatch)
//!     → response.rs (render final value)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestContext, X_REQUEST_ID};
pub use response::{render, MatchedRoute};
pub use server::HttpServer;
