use std::rc::Rc;

use indexmap::IndexMap;

use super::schema::SchemaNode;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// Where a request parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
}

/// One request parameter.
#[derive(Debug, Clone)]
pub struct EndpointParameter {
    pub location: ParameterLocation,
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
}

/// Media-type keyed schemas for one request or response body,
/// ordered by declaration.
#[derive(Debug, Clone, Default)]
pub struct ExchangeContent {
    pub content: IndexMap<String, Rc<SchemaNode>>,
}

impl ExchangeContent {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// One (HTTP method, path) pair.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub operation_id: Option<String>,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<EndpointParameter>,
    pub request: Option<ExchangeContent>,
    pub responses: IndexMap<u16, ExchangeContent>,
}

impl Endpoint {
    /// The declared summary, or the `"{METHOD}.{path}"` fallback when the
    /// author omitted one. Headings and TOC entries rely on this form.
    pub fn summary_or_path(&self) -> String {
        match &self.summary {
            Some(summary) => summary.clone(),
            None => format!("{}.{}", self.method.as_str(), self.path),
        }
    }
}
