//! Sitemap tree and segment keys.

use std::sync::Arc;

use crate::sitemap::resource::Resource;

/// A node of the sitemap: either a nested mapping or a handler.
#[derive(Debug, Clone)]
pub enum SitemapNode {
    /// Nested mapping from segment keys to child nodes.
    Branch(Sitemap),
    /// A handler terminating a sitemap path.
    Leaf(Arc<Resource>),
}

impl From<Sitemap> for SitemapNode {
    fn from(branch: Sitemap) -> Self {
        SitemapNode::Branch(branch)
    }
}

impl From<Resource> for SitemapNode {
    fn from(resource: Resource) -> Self {
        SitemapNode::Leaf(Arc::new(resource))
    }
}

impl From<Arc<Resource>> for SitemapNode {
    fn from(resource: Arc<Resource>) -> Self {
        SitemapNode::Leaf(resource)
    }
}

/// A branch of the sitemap.
///
/// Children keep their declaration order, which is also the order routes are
/// compiled and matched in. Keys are unique: declaring a key twice replaces the
/// earlier child in place.
///
/// ```rust,ignore
/// let site = Sitemap::new().route(
///     "publisher",
///     Sitemap::new().route(
///         "{publisher_id}",
///         Sitemap::new()
///             .index(Resource::new(publisher).param("publisher_id", Coercion::Int))
///             .route("author", authors),
///     ),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    children: Vec<(String, SitemapNode)>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `key` with the given child, replacing any previous child under that key.
    pub fn route(mut self, key: impl Into<String>, node: impl Into<SitemapNode>) -> Self {
        self.insert(key, node);
        self
    }

    /// Declare the index handler (empty key) of this branch.
    pub fn index(self, resource: impl Into<SitemapNode>) -> Self {
        self.route("", resource)
    }

    /// In-place variant of [`Sitemap::route`].
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<SitemapNode>) {
        let key = key.into();
        let node = node.into();
        match self.children.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = node,
            None => self.children.push((key, node)),
        }
    }

    /// Look up a direct child by its exact key.
    pub fn get(&self, key: &str) -> Option<&SitemapNode> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// The handler declared under the empty key, if it is a handler.
    pub fn index_resource(&self) -> Option<&Arc<Resource>> {
        match self.get("") {
            Some(SitemapNode::Leaf(resource)) => Some(resource),
            _ => None,
        }
    }

    /// Children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &SitemapNode)> {
        self.children.iter().map(|(k, node)| (k.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Classification of a single sitemap key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// The empty key.
    Index,
    /// A segment matched verbatim.
    Literal(&'a str),
    /// A `{name}` placeholder capturing one path segment.
    Param(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a key, rejecting keys that cannot be part of a URL template.
    pub fn parse(key: &'a str) -> Result<Self, &'static str> {
        if key.is_empty() {
            return Ok(Segment::Index);
        }
        if key.contains('/') {
            return Err("segment keys cannot contain '/'");
        }
        if let Some(name) = placeholder_name(key) {
            return Ok(Segment::Param(name));
        }
        if key.contains('{') || key.contains('}') {
            return Err("placeholders must be exactly `{identifier}`");
        }
        Ok(Segment::Literal(key))
    }
}

/// Returns the parameter name if `token` is exactly `{identifier}`.
pub fn placeholder_name(token: &str) -> Option<&str> {
    let name = token.strip_prefix('{')?.strip_suffix('}')?;
    if is_identifier(name) {
        Some(name)
    } else {
        None
    }
}

/// One or more word characters (letters, digits, underscore).
fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}
