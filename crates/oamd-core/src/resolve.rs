use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};

use crate::error::ResolveError;
use crate::example::{ExampleSynthesizer, PrimitiveKind};
use crate::locale::Messages;
use crate::model::{PropertyType, SchemaNode, SchemaProperty};
use crate::parse::schema::{Schema, SchemaOrRef, SchemaType};

/// Closed classification of the schema shapes the resolver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaShape {
    Object,
    Array,
    AllOf,
    OneOf,
    AnyOf,
    Primitive(PrimitiveKind),
}

enum CacheEntry {
    /// Marked before descending into a name's properties, so a
    /// self-reference encountered mid-resolution terminates.
    InProgress,
    Done(Rc<SchemaNode>),
}

/// Resolves `$ref` indirection and composition into `SchemaNode`s.
///
/// Named schemas are memoized by name: the cache is scoped to this resolver,
/// one resolver per parse run. A second request for a name returns the
/// identical `Rc` without recomputation.
pub struct SchemaResolver<'a> {
    catalog: Option<&'a IndexMap<String, SchemaOrRef>>,
    cache: IndexMap<String, CacheEntry>,
    synthesizer: ExampleSynthesizer,
    messages: &'a Messages,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(
        catalog: Option<&'a IndexMap<String, SchemaOrRef>>,
        synthesizer: ExampleSynthesizer,
        messages: &'a Messages,
    ) -> Self {
        Self {
            catalog,
            cache: IndexMap::new(),
            synthesizer,
            messages,
        }
    }

    /// Resolve every named schema in catalog declaration order.
    pub fn resolve_catalog(&mut self) -> Result<Vec<Rc<SchemaNode>>, ResolveError> {
        let Some(catalog) = self.catalog else {
            return Ok(Vec::new());
        };
        let names: Vec<String> = catalog.keys().cloned().collect();
        names.iter().map(|name| self.resolve_name(name)).collect()
    }

    /// Resolve a reference or inline schema. Inline schemas build anonymous
    /// nodes; references go through the name cache.
    pub fn resolve(&mut self, schema_or_ref: &SchemaOrRef) -> Result<Rc<SchemaNode>, ResolveError> {
        match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => {
                let name = parse_ref_name(ref_path)?;
                self.resolve_name(name)
            }
            SchemaOrRef::Schema(schema) => Ok(Rc::new(self.build_node(None, schema)?)),
        }
    }

    /// Resolve a named schema through the memoization cache.
    pub fn resolve_name(&mut self, name: &str) -> Result<Rc<SchemaNode>, ResolveError> {
        match self.cache.get(name) {
            Some(CacheEntry::Done(node)) => return Ok(Rc::clone(node)),
            Some(CacheEntry::InProgress) => return Ok(forward_node(name)),
            None => {}
        }

        let entry = self
            .catalog
            .and_then(|c| c.get(name))
            .ok_or_else(|| ResolveError::RefTargetNotFound(name.to_string()))?;

        match entry {
            // Catalog aliases (`Name: {$ref: ...}`) resolve under the target
            // name and are not cached under their own.
            SchemaOrRef::Ref { .. } => {
                let (target, schema) = deref(self.catalog, entry)?;
                match target {
                    Some(target_name) => self.resolve_name(target_name),
                    None => Ok(Rc::new(self.build_node(None, schema)?)),
                }
            }
            SchemaOrRef::Schema(schema) => {
                debug!("resolving schema {name}");
                self.cache
                    .insert(name.to_string(), CacheEntry::InProgress);
                let node = Rc::new(self.build_node(Some(name), schema)?);
                self.cache
                    .insert(name.to_string(), CacheEntry::Done(Rc::clone(&node)));
                Ok(node)
            }
        }
    }

    fn build_node(&mut self, name: Option<&str>, schema: &Schema) -> Result<SchemaNode, ResolveError> {
        match classify(schema) {
            SchemaShape::AllOf | SchemaShape::Object => self.build_object_node(name, schema),
            SchemaShape::OneOf | SchemaShape::AnyOf => self.build_variant_node(name, schema),
            SchemaShape::Array => self.build_array_node(name, schema),
            SchemaShape::Primitive(kind) => self.build_primitive_node(name, schema, kind),
        }
    }

    /// Objects and `allOf` compositions: one merged, ordered property map.
    fn build_object_node(
        &mut self,
        name: Option<&str>,
        schema: &Schema,
    ) -> Result<SchemaNode, ResolveError> {
        let merged = collect_properties(self.catalog, schema)?;

        let mut properties = Vec::with_capacity(merged.len());
        for (prop_name, prop_sor) in merged {
            let (_, prop_schema) = deref(self.catalog, prop_sor)?;
            let node = self.resolve(prop_sor)?;
            // Requiredness comes from the owning schema's list, never from
            // the property's own schema.
            let required = schema.required.iter().any(|r| r == prop_name);
            properties.push(SchemaProperty {
                name: prop_name.to_string(),
                type_name: property_type(prop_schema),
                format: prop_schema.format.clone(),
                description: prop_schema.description.clone(),
                example: node.example.clone(),
                required,
                schema: node,
            });
        }

        let example = object_example(&properties);
        Ok(SchemaNode {
            name: name.map(str::to_string),
            description: schema.description.clone(),
            properties,
            example,
            item_schema: None,
        })
    }

    /// `oneOf`/`anyOf`: the first listed variant stands in for the union.
    fn build_variant_node(
        &mut self,
        name: Option<&str>,
        schema: &Schema,
    ) -> Result<SchemaNode, ResolveError> {
        let variants = if schema.one_of.is_empty() {
            &schema.any_of
        } else {
            &schema.one_of
        };
        match variants.first() {
            Some(first) => {
                let representative = self.resolve(first)?;
                Ok(SchemaNode {
                    name: name.map(str::to_string),
                    description: schema
                        .description
                        .clone()
                        .or_else(|| representative.description.clone()),
                    properties: representative.properties.clone(),
                    example: representative.example.clone(),
                    item_schema: representative.item_schema.clone(),
                })
            }
            None => Ok(SchemaNode {
                name: name.map(str::to_string),
                description: schema.description.clone(),
                properties: Vec::new(),
                example: Value::Object(Map::new()),
                item_schema: None,
            }),
        }
    }

    fn build_array_node(
        &mut self,
        name: Option<&str>,
        schema: &Schema,
    ) -> Result<SchemaNode, ResolveError> {
        let items = schema.items.as_deref().ok_or_else(|| {
            ResolveError::UnsupportedSchema("array without an items schema".to_string())
        })?;
        let item = self.resolve(items)?;
        // One representative element, not a variable-length array.
        let example = Value::Array(vec![item.example.clone()]);
        Ok(SchemaNode {
            name: name.map(str::to_string),
            description: schema.description.clone(),
            properties: Vec::new(),
            example,
            item_schema: Some(item),
        })
    }

    fn build_primitive_node(
        &mut self,
        name: Option<&str>,
        schema: &Schema,
        kind: PrimitiveKind,
    ) -> Result<SchemaNode, ResolveError> {
        let example = self.synthesizer.synthesize(
            kind,
            schema.format.as_deref(),
            schema.example.as_ref(),
            self.messages,
        )?;
        Ok(SchemaNode {
            name: name.map(str::to_string),
            description: schema.description.clone(),
            properties: Vec::new(),
            example,
            item_schema: None,
        })
    }
}

/// Forward reference for a name whose resolution is in progress: the name
/// and an empty shape, breaking the cycle without ownership.
fn forward_node(name: &str) -> Rc<SchemaNode> {
    Rc::new(SchemaNode {
        name: Some(name.to_string()),
        description: None,
        properties: Vec::new(),
        example: Value::Object(Map::new()),
        item_schema: None,
    })
}

fn object_example(properties: &[SchemaProperty]) -> Value {
    let mut map = Map::new();
    for property in properties {
        map.insert(property.name.clone(), property.example.clone());
    }
    Value::Object(map)
}

/// Follow a `$ref` chain down to a concrete schema. Returns the name of the
/// final named target (when the input was a reference) and the schema
/// itself. Pure alias cycles are an error.
fn deref<'s>(
    catalog: Option<&'s IndexMap<String, SchemaOrRef>>,
    schema_or_ref: &'s SchemaOrRef,
) -> Result<(Option<&'s str>, &'s Schema), ResolveError> {
    let mut current = schema_or_ref;
    let mut name = None;
    let mut visited: HashSet<&str> = HashSet::new();
    loop {
        match current {
            SchemaOrRef::Schema(schema) => return Ok((name, schema.as_ref())),
            SchemaOrRef::Ref { ref_path } => {
                let target = parse_ref_name(ref_path)?;
                if !visited.insert(target) {
                    return Err(ResolveError::CircularRef(ref_path.clone()));
                }
                current = catalog
                    .and_then(|c| c.get(target))
                    .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
                name = Some(target);
            }
        }
    }
}

/// Merge the property maps of every `allOf` branch (recursively) and the
/// schema's own declarations into one ordered map. When a name repeats,
/// the last-declared branch wins; the first declaration keeps its position.
fn collect_properties<'s>(
    catalog: Option<&'s IndexMap<String, SchemaOrRef>>,
    schema: &'s Schema,
) -> Result<IndexMap<&'s str, &'s SchemaOrRef>, ResolveError> {
    let mut properties = IndexMap::new();
    for branch in &schema.all_of {
        let (_, branch_schema) = deref(catalog, branch)?;
        for (name, prop) in collect_properties(catalog, branch_schema)? {
            properties.insert(name, prop);
        }
    }
    for (name, prop) in &schema.properties {
        properties.insert(name.as_str(), prop);
    }
    Ok(properties)
}

/// The raw `type` keyword for property tables; absent and `null` collapse
/// to object.
fn property_type(schema: &Schema) -> PropertyType {
    match schema.schema_type {
        Some(SchemaType::String) => PropertyType::String,
        Some(SchemaType::Integer) => PropertyType::Integer,
        Some(SchemaType::Number) => PropertyType::Number,
        Some(SchemaType::Boolean) => PropertyType::Boolean,
        Some(SchemaType::Array) => PropertyType::Array,
        Some(SchemaType::Object) | Some(SchemaType::Null) | None => PropertyType::Object,
    }
}

fn classify(schema: &Schema) -> SchemaShape {
    if !schema.all_of.is_empty() {
        return SchemaShape::AllOf;
    }
    if !schema.one_of.is_empty() {
        return SchemaShape::OneOf;
    }
    if !schema.any_of.is_empty() {
        return SchemaShape::AnyOf;
    }
    match schema.schema_type {
        Some(SchemaType::Array) => SchemaShape::Array,
        Some(SchemaType::String) => SchemaShape::Primitive(string_kind(schema.format.as_deref())),
        Some(SchemaType::Integer) => SchemaShape::Primitive(PrimitiveKind::Integer),
        Some(SchemaType::Number) => SchemaShape::Primitive(PrimitiveKind::Number),
        Some(SchemaType::Boolean) => SchemaShape::Primitive(PrimitiveKind::Boolean),
        // Absent and null types fall back to a free-form object.
        Some(SchemaType::Object) | Some(SchemaType::Null) | None => SchemaShape::Object,
    }
}

/// String formats map onto dedicated primitive kinds; unrecognized formats
/// stay plain strings.
fn string_kind(format: Option<&str>) -> PrimitiveKind {
    match format {
        Some("uuid") => PrimitiveKind::Uuid,
        Some("date") => PrimitiveKind::Date,
        Some("date-time") => PrimitiveKind::DateTime,
        Some("email") => PrimitiveKind::Email,
        Some("byte") => PrimitiveKind::ByteArray,
        Some("binary") => PrimitiveKind::File,
        _ => PrimitiveKind::String,
    }
}

fn parse_ref_name(ref_path: &str) -> Result<&str, ResolveError> {
    ref_path
        .strip_prefix("#/components/schemas/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))
}
