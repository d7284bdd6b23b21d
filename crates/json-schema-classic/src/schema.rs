//! Parsed schema nodes for the classic dialect.
//!
//! Parsing is permissive, matching the behavior of the original validators
//! for this dialect: unrecognized keywords are ignored, and a recognized
//! keyword whose value has the wrong JSON kind is ignored as well. The only
//! thing that survives as a defect is a schema position that is not a mapping
//! at all — that is preserved as [`SchemaEntry::Invalid`] and reported by the
//! engine as an `Invalid schema/property definition` validation error.

use indexmap::IndexMap;
use serde_json::Value;

/// A position that structurally requires a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaEntry {
    /// A well-formed schema node.
    Node(Box<SchemaNode>),
    /// A non-mapping value where a schema was expected.
    Invalid(Value),
}

impl SchemaEntry {
    /// Parse a JSON value as a schema.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => SchemaEntry::Node(Box::new(SchemaNode::from_map(map))),
            other => SchemaEntry::Invalid(other.clone()),
        }
    }
}

/// The `type` (or `disallow`) keyword: a name, a union, or an inline schema.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    /// A type name such as `"string"` or `"integer"`.
    Named(String),
    /// An ordered union; the first member that matches wins.
    Union(Vec<TypeSpec>),
    /// An inline schema node, validated with an isolated error buffer.
    Inline(Box<SchemaEntry>),
}

impl TypeSpec {
    /// Parse a `type`/`disallow` keyword value.
    ///
    /// Anything that is not a name, a list, or a mapping becomes an
    /// `Inline(Invalid)` member, which reports an invalid-definition error
    /// when tried.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(name) => TypeSpec::Named(name.clone()),
            Value::Array(members) => {
                TypeSpec::Union(members.iter().map(TypeSpec::from_value).collect())
            }
            other => TypeSpec::Inline(Box::new(SchemaEntry::from_value(other))),
        }
    }
}

/// The `items` keyword: one schema for every element, or a positional list.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    /// A single schema applied to each element of the instance array.
    Single(Box<SchemaEntry>),
    /// An ordered list of schemas applied positionally.
    Tuple(Vec<SchemaEntry>),
}

/// One parsed schema node: an optional field per recognized keyword.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    pub type_spec: Option<TypeSpec>,
    pub properties: Option<IndexMap<String, SchemaEntry>>,
    pub items: Option<Items>,
    /// `None` means additional properties are disallowed. JSON `false` maps
    /// to `None`; JSON `true` maps to an empty, accept-anything node.
    pub additional_properties: Option<Box<SchemaEntry>>,
    pub optional: bool,
    pub readonly: bool,
    pub extends: Option<Box<SchemaEntry>>,
    pub requires: Option<String>,
    pub disallow: Option<TypeSpec>,
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    /// Raw bound value; numeric or lexicographic comparison is decided by the
    /// instance value's kind at check time.
    pub minimum: Option<Value>,
    pub maximum: Option<Value>,
    pub enum_values: Option<Vec<Value>>,
    pub max_decimal: Option<u64>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

impl SchemaNode {
    /// Parse a schema node from a JSON mapping.
    pub fn from_map(map: &serde_json::Map<String, Value>) -> Self {
        SchemaNode {
            type_spec: map.get("type").map(TypeSpec::from_value),
            properties: map.get("properties").and_then(Value::as_object).map(|props| {
                props
                    .iter()
                    .map(|(k, v)| (k.clone(), SchemaEntry::from_value(v)))
                    .collect()
            }),
            items: map.get("items").map(|items| match items {
                Value::Array(list) => {
                    Items::Tuple(list.iter().map(SchemaEntry::from_value).collect())
                }
                single => Items::Single(Box::new(SchemaEntry::from_value(single))),
            }),
            additional_properties: match map.get("additionalProperties") {
                None | Some(Value::Bool(false)) => None,
                Some(Value::Bool(true)) => {
                    Some(Box::new(SchemaEntry::Node(Box::new(SchemaNode::default()))))
                }
                Some(other) => Some(Box::new(SchemaEntry::from_value(other))),
            },
            optional: map.get("optional").and_then(Value::as_bool).unwrap_or(false),
            readonly: map.get("readonly").and_then(Value::as_bool).unwrap_or(false),
            extends: map
                .get("extends")
                .map(|v| Box::new(SchemaEntry::from_value(v))),
            requires: map
                .get("requires")
                .and_then(Value::as_str)
                .map(str::to_string),
            disallow: map.get("disallow").map(TypeSpec::from_value),
            pattern: map
                .get("pattern")
                .and_then(Value::as_str)
                .map(str::to_string),
            min_length: map.get("minLength").and_then(Value::as_u64),
            max_length: map.get("maxLength").and_then(Value::as_u64),
            minimum: map.get("minimum").cloned(),
            maximum: map.get("maximum").cloned(),
            enum_values: map.get("enum").and_then(Value::as_array).cloned(),
            max_decimal: map.get("maxDecimal").and_then(Value::as_u64),
            min_items: map.get("minItems").and_then(Value::as_u64),
            max_items: map.get("maxItems").and_then(Value::as_u64),
        }
    }
}
