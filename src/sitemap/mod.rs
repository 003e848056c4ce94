//! Sitemap declaration model.
//!
//! # Data Flow
//! ```text
//! Application code
//!     → node.rs (Sitemap branches, SitemapNode::{Branch, Leaf})
//!     → resource.rs (handler + parameter descriptors + render strategy)
//!     → routing::compiler (flattened into CompiledRoutes)
//! ```
//!
//! # Design Decisions
//! - Declaration is purely structural; shape errors surface at compile time
//! - Tree, not graph: branches own their children
//! - Parameter descriptors are collected at registration, never by reflection

pub mod node;
pub mod resource;

use thiserror::Error;

pub use node::{placeholder_name, Segment, Sitemap, SitemapNode};
pub use resource::{Handler, HandlerResult, ParamSpec, Render, Resource};

/// Errors raised while compiling a sitemap into routes.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// A key cannot be used as a URL segment.
    #[error("invalid segment `{key}` at `{path}`: {reason}")]
    InvalidSegment {
        path: String,
        key: String,
        reason: &'static str,
    },

    /// A node has a shape the compiler cannot route.
    #[error("invalid sitemap node at `{path}`: {reason}")]
    InvalidNode { path: String, reason: &'static str },

    /// The same placeholder appears twice along one route.
    #[error("parameter `{name}` declared more than once on route `{path}`")]
    DuplicateParameter { path: String, name: String },

    /// The generated pattern was rejected by the regex engine.
    #[error("failed to compile pattern for `{path}`: {source}")]
    Pattern {
        path: String,
        #[source]
        source: regex::Error,
    },
}
