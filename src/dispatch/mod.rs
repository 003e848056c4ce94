//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Matched CompiledRoute + captured path values
//!     → dispatcher.rs (re-walk sitemap along the route's segments)
//!     → coerce.rs (convert raw values per handler descriptor)
//!     → context.rs (Params threaded through the handler chain)
//!     → Resolved value, or DispatchError (error.rs)
//! ```
//!
//! # Design Decisions
//! - One `Params` per request, never shared
//! - Handlers are synchronous and run inline on the request task
//! - Structured handler errors end the chain; anything else is internal

pub mod coerce;
pub mod context;
pub mod dispatcher;
pub mod error;

pub use coerce::{coerce, Coercion};
pub use context::{BindingState, Params};
pub use dispatcher::{dispatch, Resolved};
pub use error::{BoxError, DispatchError, HandlerError, HttpError};
