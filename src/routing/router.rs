//! Route table and dispatch entry point.
//!
//! # Responsibilities
//! - Own the sitemap and its compiled routes
//! - Look up the first route matching a request path
//! - Run the handler chain and produce exactly one response
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) pattern scan in declaration order (acceptable for typical route counts)
//! - Explicit not-found rather than silent default
//! - Unstructured handler failures are returned, not rendered

use axum::response::{IntoResponse, Response};

use crate::config::RouterConfig;
use crate::dispatch::dispatcher::{dispatch, Resolved};
use crate::dispatch::error::{BoxError, DispatchError};
use crate::http::request::RequestContext;
use crate::http::response::{render, MatchedRoute};
use crate::routing::compiler::{compile, CompiledRoute};
use crate::sitemap::{Sitemap, SitemapError};

/// Compiled sitemap ready to serve requests.
#[derive(Debug)]
pub struct SitemapRouter {
    sitemap: Sitemap,
    routes: Vec<CompiledRoute>,
}

impl SitemapRouter {
    /// Compile `sitemap`. Fails on any shape error before serving.
    pub fn new(sitemap: Sitemap, config: &RouterConfig) -> Result<Self, SitemapError> {
        let routes = compile(&sitemap, &config.prefix, config.trailing_slash)?;
        Ok(Self { sitemap, routes })
    }

    /// Routes in match order.
    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    /// First route matching `path`, with its captured parameters.
    pub fn match_path(&self, path: &str) -> Option<(&CompiledRoute, Vec<(String, String)>)> {
        self.routes
            .iter()
            .find_map(|route| route.captures(path).map(|captures| (route, captures)))
    }

    /// Match and run the handler chain for `request`.
    ///
    /// The path is percent-decoded before matching, so literal keys and
    /// captured values are compared as text.
    pub fn dispatch(&self, request: &RequestContext) -> Result<Resolved, DispatchError> {
        let raw_path = request.path();
        let decoded = urlencoding::decode(raw_path).map_err(|_| {
            tracing::debug!(request_id = %request.request_id, path = %raw_path, "Undecodable path");
            DispatchError::InvalidPath {
                path: raw_path.to_string(),
            }
        })?;
        let path: &str = &decoded;

        let Some((route, captures)) = self.match_path(path) else {
            tracing::debug!(request_id = %request.request_id, path = %path, "No route matched");
            return Err(DispatchError::NotFound {
                path: path.to_string(),
            });
        };

        tracing::debug!(
            request_id = %request.request_id,
            path = %path,
            route = %route.template(),
            "Route matched"
        );
        dispatch(&self.sitemap, route, &captures, request)
    }

    /// Answer `request`.
    ///
    /// Not-found, bad parameters and handler HTTP errors become responses;
    /// unstructured handler failures are returned to the caller.
    pub fn respond(&self, request: &RequestContext) -> Result<Response, BoxError> {
        match self.dispatch(request) {
            Ok(resolved) => {
                let mut response = render(resolved.value, resolved.render);
                response
                    .extensions_mut()
                    .insert(MatchedRoute(resolved.route));
                Ok(response)
            }
            Err(DispatchError::Handler(err)) => Ok(err.into_response()),
            Err(err) => match err.status() {
                Some(status) => Ok((status, err.to_string()).into_response()),
                None => Err(err.into()),
            },
        }
    }
}
