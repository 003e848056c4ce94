//! Handler chain execution for a matched route.
//!
//! # Responsibilities
//! - Re-walk the sitemap along the matched route's segments
//! - Bind captured values, coerce, and invoke every handler met on the way
//! - Hand each handler's return value to the handlers nested under it
//!
//! # Design Decisions
//! - The walk follows the route's declared tokens, not the request path
//! - A handler's value overwrites the parameter bound most recently before it
//! - Any walk inconsistency is a not-found, never a panic

use serde_json::Value;

use crate::dispatch::coerce::coerce;
use crate::dispatch::context::Params;
use crate::dispatch::error::{DispatchError, HandlerError};
use crate::http::request::RequestContext;
use crate::routing::compiler::CompiledRoute;
use crate::sitemap::{placeholder_name, Render, Resource, Sitemap, SitemapNode};

/// Final value of a handler chain, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    /// Render strategy of the route's own handler.
    pub render: Render,
    /// Template of the matched route, e.g. `/publisher/{publisher_id}`.
    pub route: String,
}

/// Run the handler chain of `route` for a request whose path produced
/// `captures`.
pub fn dispatch(
    sitemap: &Sitemap,
    route: &CompiledRoute,
    captures: &[(String, String)],
    request: &RequestContext,
) -> Result<Resolved, DispatchError> {
    let not_found = || DispatchError::NotFound {
        path: request.path().to_string(),
    };

    let mut chain = Chain {
        request,
        params: Params::new(),
        last_bound: None,
        result: None,
    };

    let segments = route.path_segments();
    if segments.is_empty() {
        let index = sitemap.index_resource().ok_or_else(not_found)?;
        chain.invoke(index)?;
    }

    let mut branch = Some(sitemap);
    for segment in segments {
        if let Some(name) = placeholder_name(segment) {
            let raw = captures
                .iter()
                .find(|(captured, _)| captured == name)
                .map(|(_, raw)| raw.as_str())
                .ok_or_else(not_found)?;
            chain.params.bind_raw(name, raw);
            chain.last_bound = Some(name.to_string());
        }

        let node = branch
            .and_then(|current| current.get(segment))
            .ok_or_else(not_found)?;

        match node {
            SitemapNode::Leaf(resource) => {
                chain.invoke(resource)?;
                branch = None;
            }
            SitemapNode::Branch(child) => {
                if let Some(index) = child.index_resource() {
                    chain.invoke(index)?;
                }
                branch = Some(child);
            }
        }
    }

    let value = chain.result.ok_or_else(not_found)?;
    Ok(Resolved {
        value,
        render: route.resource().render_strategy(),
        route: route.template(),
    })
}

struct Chain<'a> {
    request: &'a RequestContext,
    params: Params,
    last_bound: Option<String>,
    result: Option<Value>,
}

impl Chain<'_> {
    fn invoke(&mut self, resource: &Resource) -> Result<(), DispatchError> {
        if let Err(err) = coerce(resource, &mut self.params) {
            tracing::warn!(
                request_id = %self.request.request_id,
                handler = %resource.name(),
                error = %err,
                "Path parameter rejected"
            );
            return Err(err);
        }

        tracing::debug!(
            request_id = %self.request.request_id,
            handler = %resource.name(),
            params = self.params.len(),
            "Invoking handler"
        );

        let value = resource
            .call(self.request, &self.params)
            .map_err(|err| match err {
                HandlerError::Http(http) => {
                    tracing::debug!(
                        request_id = %self.request.request_id,
                        handler = %resource.name(),
                        status = %http.status,
                        "Handler ended chain"
                    );
                    DispatchError::Handler(http)
                }
                HandlerError::Failed(source) => DispatchError::Internal {
                    handler: resource.name().to_string(),
                    source,
                },
            })?;

        if let Some(name) = &self.last_bound {
            self.params.resolve(name, value.clone());
        }
        self.result = Some(value);
        Ok(())
    }
}
