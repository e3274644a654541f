use std::rc::Rc;

use serde_json::Value;

/// Resolved, flattened representation of one schema definition or inline
/// schema. Named schemas are built once per parse run and shared via `Rc`;
/// repeated references to the same name return the identical node.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    /// Present for components-section named schemas, absent for inline ones.
    pub name: Option<String>,
    pub description: Option<String>,
    /// Declaration order, after composition merge.
    pub properties: Vec<SchemaProperty>,
    /// Materialized example value, computed at resolution time.
    pub example: Value,
    /// Present if and only if the underlying schema was array-typed.
    pub item_schema: Option<Rc<SchemaNode>>,
}

impl SchemaNode {
    /// Display name for table rendering: the schema name when present,
    /// otherwise nothing (anonymous schemas fall back to their type label).
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// One field within a `SchemaNode`.
#[derive(Debug, Clone)]
pub struct SchemaProperty {
    pub name: String,
    pub type_name: PropertyType,
    pub format: Option<String>,
    pub description: Option<String>,
    pub example: Value,
    /// Derived from the owning schema's `required` list.
    pub required: bool,
    /// Resolved node for this property, for recursive rendering.
    pub schema: Rc<SchemaNode>,
}

/// The raw `type` keyword of a property schema. Absent and `null` types
/// collapse to `Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Array => "array",
            PropertyType::Object => "object",
        }
    }
}
