//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     Sitemap
//!     → compiler.rs (depth-first walk, one route per handler)
//!     → Compile anchored patterns
//!     → Freeze as immutable SitemapRouter
//!
//! Incoming Request (path)
//!     → router.rs (first matching pattern)
//!     → dispatch::dispatcher (handler chain)
//!     → Return: rendered response or error
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by declaration)

pub mod compiler;
pub mod router;

pub use compiler::{compile, normalize_prefix, CompiledRoute};
pub use router::SitemapRouter;
