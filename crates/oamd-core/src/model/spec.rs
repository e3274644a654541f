use std::rc::Rc;

use super::endpoint::{Endpoint, HttpMethod};
use super::schema::SchemaNode;

/// A `(method, path)` reference into the endpoint list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRef {
    pub method: HttpMethod,
    pub path: String,
}

/// One tag grouping with the operations declared under it.
#[derive(Debug, Clone)]
pub struct SpecTag {
    pub name: String,
    pub description: Option<String>,
    pub operations: Vec<OperationRef>,
}

/// Root aggregate: everything the renderer needs, built in one parse pass
/// and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Specification {
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<SpecTag>,
    pub endpoints: Vec<Endpoint>,
    /// Every named schema resolved during the run, in catalog order.
    pub schemas: Vec<Rc<SchemaNode>>,
}

impl Specification {
    pub fn endpoint(&self, method: HttpMethod, path: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.method == method && e.path == path)
    }
}
