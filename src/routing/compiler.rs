//! Sitemap → route compilation.
//!
//! # Responsibilities
//! - Walk the sitemap depth-first, in declaration order
//! - Emit one `CompiledRoute` per reachable handler
//! - Turn each segment list into an anchored pattern
//!
//! # Design Decisions
//! - Index (empty key) handlers do not lengthen the path they are declared at
//! - Literal segments are escaped; placeholders capture `\w+` only, so a
//!   parameter never spans a `/` and never matches an empty segment
//! - All shape errors are reported here, before any request is served

use std::sync::Arc;

use regex::Regex;

use crate::config::TrailingSlash;
use crate::sitemap::{placeholder_name, Resource, Segment, Sitemap, SitemapError, SitemapNode};

/// A matchable route derived from one sitemap handler.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    /// Raw tokens from the root to the handler, starting with the URL prefix.
    segments: Vec<String>,
    /// Placeholder names in path order.
    param_names: Vec<String>,
    pattern: Regex,
    resource: Arc<Resource>,
}

impl CompiledRoute {
    fn new(
        segments: Vec<String>,
        resource: Arc<Resource>,
        trailing_slash: TrailingSlash,
    ) -> Result<Self, SitemapError> {
        let mut param_names: Vec<String> = Vec::new();
        for name in segments.iter().skip(1).filter_map(|s| placeholder_name(s)) {
            if param_names.iter().any(|n| n == name) {
                return Err(SitemapError::DuplicateParameter {
                    path: template_of(&segments),
                    name: name.to_string(),
                });
            }
            param_names.push(name.to_string());
        }

        let source = pattern_source(&segments, trailing_slash);
        let pattern = Regex::new(&source).map_err(|source| SitemapError::Pattern {
            path: template_of(&segments),
            source,
        })?;

        Ok(Self {
            segments,
            param_names,
            pattern,
            resource,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments after the URL prefix.
    pub fn path_segments(&self) -> &[String] {
        self.segments.get(1..).unwrap_or_default()
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The handler this route terminates in.
    pub fn resource(&self) -> &Arc<Resource> {
        &self.resource
    }

    /// The declared URL template, e.g. `/publisher/{publisher_id}`.
    pub fn template(&self) -> String {
        template_of(&self.segments)
    }

    /// Apply the pattern to a request path, returning the captured parameters
    /// in path order.
    pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let caps = self.pattern.captures(path)?;
        let params = self
            .param_names
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();
        Some(params)
    }
}

/// Normalize a URL prefix: no trailing `/`, leading `/` when non-empty.
/// `""` and `"/"` both denote the site root.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Compile a sitemap into routes, in match order.
pub fn compile(
    sitemap: &Sitemap,
    prefix: &str,
    trailing_slash: TrailingSlash,
) -> Result<Vec<CompiledRoute>, SitemapError> {
    let mut routes = Vec::new();
    let mut segments = vec![normalize_prefix(prefix)];
    walk(sitemap, &mut segments, trailing_slash, &mut routes)?;

    tracing::info!(
        routes_count = routes.len(),
        prefix = %segments[0],
        "Sitemap compiled"
    );
    for route in &routes {
        tracing::debug!(
            template = %route.template(),
            pattern = %route.pattern.as_str(),
            handler = %route.resource.name(),
            "Route registered"
        );
    }
    Ok(routes)
}

fn walk(
    branch: &Sitemap,
    segments: &mut Vec<String>,
    trailing_slash: TrailingSlash,
    routes: &mut Vec<CompiledRoute>,
) -> Result<(), SitemapError> {
    for (key, node) in branch.children() {
        let segment = Segment::parse(key).map_err(|reason| SitemapError::InvalidSegment {
            path: key_path(segments, key),
            key: key.to_string(),
            reason,
        })?;

        match node {
            SitemapNode::Branch(child) => {
                if segment == Segment::Index {
                    return Err(SitemapError::InvalidNode {
                        path: key_path(segments, key),
                        reason: "the empty key must hold a handler, not a nested mapping",
                    });
                }
                segments.push(key.to_string());
                walk(child, segments, trailing_slash, routes)?;
                segments.pop();
            }
            SitemapNode::Leaf(resource) => {
                let mut route_segments = segments.clone();
                if segment != Segment::Index {
                    route_segments.push(key.to_string());
                }
                routes.push(CompiledRoute::new(
                    route_segments,
                    Arc::clone(resource),
                    trailing_slash,
                )?);
            }
        }
    }
    Ok(())
}

fn template_of(segments: &[String]) -> String {
    let joined = segments.join("/");
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

fn key_path(segments: &[String], key: &str) -> String {
    let mut path = segments.join("/");
    path.push('/');
    path.push_str(key);
    path
}

fn pattern_source(segments: &[String], trailing_slash: TrailingSlash) -> String {
    let mut pattern = String::from("^");
    for (i, token) in segments.iter().enumerate() {
        if i > 0 {
            pattern.push('/');
        }
        match placeholder_name(token).filter(|_| i > 0) {
            Some(name) => {
                pattern.push_str("(?P<");
                pattern.push_str(name);
                pattern.push_str(">\\w+)");
            }
            None => pattern.push_str(&regex::escape(token)),
        }
    }
    match trailing_slash {
        TrailingSlash::Optional => pattern.push_str("/?"),
        TrailingSlash::Strict if segments.iter().all(|s| s.is_empty()) => pattern.push('/'),
        TrailingSlash::Strict => {}
    }
    pattern.push('$');
    pattern
}
