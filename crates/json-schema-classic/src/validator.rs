//! Top-level validation entry points.

use serde_json::Value;

use crate::checker::{Checker, Key};
use crate::schema::SchemaEntry;
use crate::types::{Slot, ValidationResult};

/// Validate an instance against a schema.
///
/// With `Some(schema)`, the instance is checked against it; independently, if
/// the instance is self-describing (carries an embedded `$schema` key), it is
/// also validated against that embedded schema, and the two error lists merge
/// in that order. Passing `None` validates only against the embedded schema,
/// if any.
///
/// Mismatches never abort the call: every violation, including a malformed
/// schema node, becomes an entry in the returned error list.
pub fn validate(instance: &Value, schema: Option<&Value>) -> ValidationResult {
    run(instance, schema, None)
}

/// Validate a proposed change to one named property.
///
/// Runs the same recursion as [`validate`] with the property's name as the
/// change marker: `readonly` fields report an error regardless of the value,
/// and embedded `$schema` passes are suppressed. Errors are reported at the
/// `$<property>` path. An empty property name falls back to the marker
/// `"property"`.
pub fn check_property_change(value: &Value, schema: &Value, property: &str) -> ValidationResult {
    let name = if property.is_empty() { "property" } else { property };
    run(value, Some(schema), Some(name))
}

fn run(instance: &Value, schema: Option<&Value>, changing: Option<&str>) -> ValidationResult {
    let mut checker = Checker::new(changing);
    if let Some(schema) = schema {
        let entry = SchemaEntry::from_value(schema);
        let key = match changing {
            Some(name) => Key::Prop(name),
            None => Key::Root,
        };
        checker.check_property(Slot::Present(instance), &entry, "", key);
    }
    if changing.is_none() {
        if let Some(embedded) = instance.get("$schema") {
            let entry = SchemaEntry::from_value(embedded);
            checker.check_property(Slot::Present(instance), &entry, "", Key::Root);
        }
    }
    ValidationResult::new(checker.into_errors())
}
