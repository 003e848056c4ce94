//! Declarative sitemap router.
//!
//! A site is declared as a nested mapping from URL segments to handlers,
//! compiled once into an ordered route table, and served over HTTP. Handlers
//! nested under a placeholder receive the value the enclosing handler returned
//! in place of the raw path text.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod sitemap;

pub use config::schema::ServerConfig;
pub use dispatch::{Coercion, HandlerError, HttpError, Params};
pub use http::{HttpServer, RequestContext};
pub use lifecycle::{serve, Shutdown};
pub use routing::SitemapRouter;
pub use sitemap::{Render, Resource, Sitemap};
