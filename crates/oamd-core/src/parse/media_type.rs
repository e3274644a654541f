use serde::Deserialize;

use super::schema::SchemaOrRef;

/// A media type object keyed by MIME type in request/response content maps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,
}
