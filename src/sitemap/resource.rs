//! Handlers and their registration metadata.

use std::fmt;

use serde_json::Value;

use crate::dispatch::coerce::Coercion;
use crate::dispatch::context::Params;
use crate::dispatch::error::HandlerError;
use crate::http::request::RequestContext;

/// Return type of every sitemap handler.
pub type HandlerResult = Result<Value, HandlerError>;

/// A sitemap handler.
///
/// Receives the request context and the parameters resolved so far along the
/// route. Implemented for any `Fn(&RequestContext, &Params) -> HandlerResult`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: &RequestContext, params: &Params) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&RequestContext, &Params) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, request: &RequestContext, params: &Params) -> HandlerResult {
        self(request, params)
    }
}

/// How the final value of a handler chain is turned into a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Render {
    /// String rendering, `text/html`.
    #[default]
    Html,
    /// String rendering, `text/plain`.
    Text,
    /// JSON serialization, `application/json`.
    Json,
}

/// A declared path parameter of a handler.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    /// `None` passes the raw captured string through.
    pub coercion: Option<Coercion>,
}

/// A handler registered in the sitemap together with its parameter
/// descriptors and render strategy.
pub struct Resource {
    name: String,
    handler: Box<dyn Handler>,
    params: Vec<ParamSpec>,
    render: Render,
}

impl Resource {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RequestContext, &Params) -> HandlerResult + Send + Sync + 'static,
    {
        Self::from_handler(handler)
    }

    /// Wrap any [`Handler`] implementation.
    pub fn from_handler<H: Handler>(handler: H) -> Self {
        Self {
            name: std::any::type_name::<H>().to_string(),
            handler: Box::new(handler),
            params: Vec::new(),
            render: Render::default(),
        }
    }

    /// Name used in logs. Defaults to the handler's type name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Declare a path parameter converted with `coercion` before invocation.
    pub fn param(self, name: impl Into<String>, coercion: Coercion) -> Self {
        self.declare(name, Some(coercion))
    }

    /// Declare a path parameter received as the raw captured string.
    pub fn raw_param(self, name: impl Into<String>) -> Self {
        self.declare(name, None)
    }

    pub fn render(mut self, render: Render) -> Self {
        self.render = render;
        self
    }

    fn declare(mut self, name: impl Into<String>, coercion: Option<Coercion>) -> Self {
        let name = name.into();
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(spec) => spec.coercion = coercion,
            None => self.params.push(ParamSpec { name, coercion }),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn render_strategy(&self) -> Render {
        self.render
    }

    pub fn call(&self, request: &RequestContext, params: &Params) -> HandlerResult {
        self.handler.call(request, params)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("render", &self.render)
            .finish_non_exhaustive()
    }
}
