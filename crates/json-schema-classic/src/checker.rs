//! The recursive validation engine.
//!
//! One [`Checker`] is built per top-level call and owns that call's error
//! accumulator, so concurrent validations never share state. Property and
//! object checking are mutually recursive; union and inline type resolution
//! run against an isolated error buffer so that a successful member leaves no
//! trace in the outer accumulator.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::matcher::{guess_type, matches_type, textual};
use crate::schema::{Items, SchemaEntry, SchemaNode, TypeSpec};
use crate::types::{Slot, ValidationError};

/// How the current value is addressed from its parent container.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Key<'a> {
    /// Same path as the parent (root, `extends`, inline types).
    Root,
    /// Array element.
    Index(usize),
    /// Object property.
    Prop(&'a str),
}

pub(crate) struct Checker<'a> {
    errors: Vec<ValidationError>,
    /// Name of the property being changed, when running in change mode.
    /// Enables `readonly` enforcement and suppresses embedded-schema passes.
    changing: Option<&'a str>,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(changing: Option<&'a str>) -> Self {
        Self {
            errors: Vec::new(),
            changing,
        }
    }

    pub(crate) fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    fn push(&mut self, path: &str, message: String) {
        self.errors.push(ValidationError::new(path, message));
    }

    fn extend_path(path: &str, key: Key<'_>) -> String {
        match key {
            Key::Root => path.to_string(),
            Key::Index(i) => format!("{path}[{i}]"),
            Key::Prop(k) if path.is_empty() => format!("${k}"),
            Key::Prop(k) => format!("{path}.{k}"),
        }
    }

    /// Run `f` against an empty error buffer and return what it collected,
    /// restoring the outer buffer afterwards.
    fn isolated<F: FnOnce(&mut Self)>(&mut self, f: F) -> Vec<ValidationError> {
        let outer = std::mem::take(&mut self.errors);
        f(self);
        std::mem::replace(&mut self.errors, outer)
    }

    /// Validate one slot against one schema position.
    pub(crate) fn check_property(
        &mut self,
        slot: Slot<'_>,
        schema: &SchemaEntry,
        path: &str,
        key: Key<'_>,
    ) {
        let path = Self::extend_path(path, key);
        let node = match schema {
            SchemaEntry::Node(node) => node,
            SchemaEntry::Invalid(_) => {
                // At the root there is no path to hang the error on; the
                // original engine stays silent there too.
                if !path.is_empty() {
                    self.push(&path, "Invalid schema/property definition".to_string());
                }
                return;
            }
        };

        if self.changing.is_some() && node.readonly {
            self.push(&path, "is a readonly field, it can not be changed".to_string());
        }

        if let Some(base) = &node.extends {
            self.check_property(slot, base, &path, Key::Root);
        }

        let value = match slot.value() {
            Some(v) => v,
            None => {
                if !node.optional {
                    self.push(&path, "is missing and it is not optional".to_string());
                }
                return;
            }
        };

        if let Some(spec) = &node.type_spec {
            let type_errors = self.check_type(spec, value, &path);
            self.errors.extend(type_errors);
        }

        if let Some(forbidden) = &node.disallow {
            if self.check_type(forbidden, value, &path).is_empty() {
                self.push(&path, "disallowed value was matched".to_string());
            }
        }

        // A present null is exempt from structural and constraint checks.
        if value.is_null() {
            return;
        }

        if let Some(elements) = value.as_array() {
            self.check_items(node, elements, &path);
        } else if let Some(props) = &node.properties {
            self.check_object(value, props, node.additional_properties.as_deref(), &path);
        }

        self.check_constraints(node, value, &path);
    }

    /// Resolve a type spec against a value, returning the errors it produces.
    ///
    /// A union tries members in order; the first zero-error member wins, and
    /// if none matches the errors of the last member tried are reported.
    fn check_type(
        &mut self,
        spec: &TypeSpec,
        value: &Value,
        path: &str,
    ) -> Vec<ValidationError> {
        match spec {
            TypeSpec::Named(name) => {
                if matches_type(name, value) {
                    Vec::new()
                } else {
                    vec![ValidationError::new(
                        path,
                        format!(
                            "{} value found, but a {} is required",
                            guess_type(value),
                            name
                        ),
                    )]
                }
            }
            TypeSpec::Union(members) => {
                let mut last = Vec::new();
                for member in members {
                    last = self.check_type(member, value, path);
                    if last.is_empty() {
                        break;
                    }
                }
                last
            }
            TypeSpec::Inline(entry) => {
                self.isolated(|c| c.check_property(Slot::Present(value), entry, path, Key::Root))
            }
        }
    }

    /// Array half of the structural recursion: `items` plus length bounds.
    fn check_items(&mut self, node: &SchemaNode, elements: &[Value], path: &str) {
        match &node.items {
            Some(Items::Tuple(list)) => {
                // Positional: a missing element is validated as present-null.
                for (i, entry) in list.iter().enumerate() {
                    let element = elements.get(i).unwrap_or(&Value::Null);
                    self.check_property(Slot::Present(element), entry, path, Key::Index(i));
                }
            }
            Some(Items::Single(entry)) => {
                for (i, element) in elements.iter().enumerate() {
                    self.check_property(Slot::Present(element), entry, path, Key::Index(i));
                }
            }
            None => {}
        }
        if let Some(min) = node.min_items {
            if (elements.len() as u64) < min {
                self.push(path, format!("There must be a minimum of {min} in the array"));
            }
        }
        if let Some(max) = node.max_items {
            if (elements.len() as u64) > max {
                self.push(path, format!("There must be a maximum of {max} in the array"));
            }
        }
    }

    /// Object half of the structural recursion.
    ///
    /// Declared properties are checked first, in schema declaration order,
    /// then the instance's own keys: undeclared-key policy, `requires`,
    /// `additionalProperties` recursion, and embedded-`$schema` validation.
    fn check_object(
        &mut self,
        value: &Value,
        props: &IndexMap<String, SchemaEntry>,
        additional: Option<&SchemaEntry>,
        path: &str,
    ) {
        let empty = serde_json::Map::new();
        let instance = match value.as_object() {
            Some(map) => map,
            None => {
                self.push(path, "an object is required".to_string());
                &empty
            }
        };

        for (key, entry) in props {
            // Underscore-prefixed schema keys are private/internal.
            if key.starts_with('_') {
                continue;
            }
            let slot = Slot::of(instance.get(key));
            self.check_property(slot, entry, path, Key::Prop(key));
        }

        for (key, val) in instance {
            let declared = props.get(key);

            if declared.is_none() && additional.is_none() && !key.starts_with('_') {
                self.push(
                    path,
                    format!(
                        "The property {key} is not defined in the schema and the schema does not allow additional properties"
                    ),
                );
            }

            if let Some(SchemaEntry::Node(decl)) = declared {
                if let Some(required) = &decl.requires {
                    if !instance.contains_key(required) {
                        self.push(
                            path,
                            format!(
                                "the presence of the property {key} requires that {required} also be present"
                            ),
                        );
                    }
                }
            }

            if declared.is_none() {
                if let Some(entry) = additional {
                    self.check_property(Slot::Present(val), entry, path, Key::Prop(key));
                }
            }

            if self.changing.is_none() {
                if let Some(embedded) = val.get("$schema") {
                    let entry = SchemaEntry::from_value(embedded);
                    self.check_property(Slot::Present(val), &entry, path, Key::Prop(key));
                }
            }
        }
    }

    /// Scalar constraint battery. Each check is gated on the value's kind;
    /// an inapplicable check is skipped, not an error.
    fn check_constraints(&mut self, node: &SchemaNode, value: &Value, path: &str) {
        if let Some(text) = value.as_str() {
            if let Some(pattern) = &node.pattern {
                // An unparseable pattern is skipped: violations are reported
                // as errors, never raised.
                if let Ok(re) = Regex::new(pattern) {
                    if !re.is_match(text) {
                        self.push(path, format!("does not match the regex pattern {pattern}"));
                    }
                }
            }
            if let Some(max) = node.max_length {
                if text.chars().count() as u64 > max {
                    self.push(path, format!("may only be {max} characters long"));
                }
            }
            if let Some(min) = node.min_length {
                if (text.chars().count() as u64) < min {
                    self.push(path, format!("must be at least {min} characters long"));
                }
            }
        }

        if let Some(bound) = &node.minimum {
            self.check_bound(value, bound, path, Bound::Minimum);
        }
        if let Some(bound) = &node.maximum {
            self.check_bound(value, bound, path, Bound::Maximum);
        }

        if let Some(allowed) = &node.enum_values {
            if !allowed.iter().any(|member| member == value) {
                let joined = allowed
                    .iter()
                    .map(literal_text)
                    .collect::<Vec<_>>()
                    .join(", ");
                self.push(
                    path,
                    format!("does not have a value in the enumeration {joined}"),
                );
            }
        }

        if let Some(max_decimal) = node.max_decimal {
            if let Some(text) = textual(value) {
                if let Some(fraction) = text.split('.').nth(1) {
                    if fraction.len() as u64 > max_decimal {
                        self.push(
                            path,
                            format!("may only have {max_decimal} digits of decimal places"),
                        );
                    }
                }
            }
        }
    }

    /// `minimum`/`maximum`: the comparison is driven by the value's kind, not
    /// the declared type. String values compare lexicographically against the
    /// bound's textual form; anything numeric compares as `f64`. A bound that
    /// cannot be interpreted for the value's kind is skipped.
    fn check_bound(&mut self, value: &Value, bound: &Value, path: &str, which: Bound) {
        if let Value::String(text) = value {
            let Some(limit) = textual(bound) else {
                return;
            };
            let violated = match which {
                Bound::Minimum => text.as_str() < limit.as_ref(),
                Bound::Maximum => text.as_str() > limit.as_ref(),
            };
            if violated {
                self.push(
                    path,
                    format!("must have a {} value of '{limit}'", which.word()),
                );
            }
        } else if let Some(number) = value.as_f64() {
            let limit = match bound {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            let Some(limit) = limit else {
                return;
            };
            let violated = match which {
                Bound::Minimum => number < limit,
                Bound::Maximum => number > limit,
            };
            if violated {
                self.push(
                    path,
                    format!("must have a {} value of {}", which.word(), literal_text(bound)),
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Minimum,
    Maximum,
}

impl Bound {
    fn word(self) -> &'static str {
        match self {
            Bound::Minimum => "minimum",
            Bound::Maximum => "maximum",
        }
    }
}

/// Literal textual form of a value for messages: strings unquoted, everything
/// else in JSON notation.
fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(instance: Value, schema: Value) -> Vec<ValidationError> {
        let entry = SchemaEntry::from_value(&schema);
        let mut checker = Checker::new(None);
        checker.check_property(Slot::Present(&instance), &entry, "", Key::Root);
        checker.into_errors()
    }

    #[test]
    fn test_path_extension() {
        assert_eq!(Checker::extend_path("", Key::Root), "");
        assert_eq!(Checker::extend_path("", Key::Prop("name")), "$name");
        assert_eq!(Checker::extend_path("$name", Key::Prop("first")), "$name.first");
        assert_eq!(Checker::extend_path("$tags", Key::Index(2)), "$tags[2]");
        assert_eq!(Checker::extend_path("$a[0]", Key::Prop("b")), "$a[0].b");
    }

    #[test]
    fn test_type_mismatch_names_guessed_kind() {
        let errors = check(json!("hello"), json!({"type": "integer"}));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "string value found, but a integer is required"
        );
    }

    #[test]
    fn test_union_first_match_wins() {
        assert!(check(json!("5"), json!({"type": ["string", "number"]})).is_empty());
    }

    #[test]
    fn test_union_failure_reports_last_member_only() {
        let errors = check(json!({"a": 1}), json!({"type": ["string", "number"]}));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "object value found, but a number is required"
        );
    }

    #[test]
    fn test_inline_type_schema_isolated() {
        let schema = json!({"type": {"properties": {"a": {"type": "integer"}}}});
        assert!(check(json!({"a": 3}), schema.clone()).is_empty());
        let errors = check(json!({"a": "x"}), schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].property, "$a");
    }

    #[test]
    fn test_disallow_matching_type_is_an_error() {
        let errors = check(json!(5), json!({"disallow": "integer"}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "disallowed value was matched");
        assert!(check(json!("abc"), json!({"disallow": "integer"})).is_empty());
    }

    #[test]
    fn test_null_skips_constraints_but_not_type() {
        // Type matching still applies to a present null.
        let errors = check(json!(null), json!({"type": "string", "minLength": 2}));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("null value found"));
        // Constraint battery is skipped entirely for null.
        assert!(check(json!(null), json!({"minLength": 2, "pattern": "^x"})).is_empty());
        assert!(check(json!(null), json!({"type": "null"})).is_empty());
    }

    #[test]
    fn test_extends_errors_accumulate_at_same_path() {
        let schema = json!({
            "extends": {"type": "integer"},
            "maximum": 3
        });
        let errors = check(json!(7), schema);
        // One from the extended node's own maximum, none from extends.
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].property, "");

        let errors = check(json!("x"), json!({"extends": {"type": "integer"}}));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "string value found, but a integer is required"
        );
    }

    #[test]
    fn test_lexicographic_bounds_for_strings() {
        let errors = check(json!("apple"), json!({"minimum": "banana"}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "must have a minimum value of 'banana'");
        assert!(check(json!("cherry"), json!({"minimum": "banana"})).is_empty());
    }

    #[test]
    fn test_numeric_bounds_unquoted_message() {
        let errors = check(json!(15), json!({"maximum": 10}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "must have a maximum value of 10");
    }

    #[test]
    fn test_max_decimal() {
        let errors = check(json!(3.14159), json!({"maxDecimal": 2}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "may only have 2 digits of decimal places");
        assert!(check(json!(3.14), json!({"maxDecimal": 2})).is_empty());
        assert!(check(json!(3), json!({"maxDecimal": 2})).is_empty());
    }

    #[test]
    fn test_invalid_schema_definition_reported_on_non_empty_path() {
        let schema = json!({"properties": {"a": "not-a-schema"}});
        let errors = check(json!({"a": 1}), schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].property, "$a");
        assert_eq!(errors[0].message, "Invalid schema/property definition");
    }

    #[test]
    fn test_invalid_schema_at_root_is_silent() {
        assert!(check(json!({"a": 1}), json!("bogus")).is_empty());
    }

    #[test]
    fn test_tuple_items_missing_element_is_present_null() {
        let schema = json!({"items": [{"type": "string"}, {"type": "string"}]});
        let errors = check(json!(["only-one"]), schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].property, "[1]");
        assert_eq!(
            errors[0].message,
            "null value found, but a string is required"
        );
    }

    #[test]
    fn test_single_item_schema_applies_to_every_element() {
        let schema = json!({"items": {"type": "integer"}});
        let errors = check(json!([1, "x", 3, "y"]), schema);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].property, "[1]");
        assert_eq!(errors[1].property, "[3]");
    }

    #[test]
    fn test_object_required_for_properties() {
        let errors = check(json!(5), json!({"properties": {"a": {"optional": true}}}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "an object is required");
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        assert!(check(json!("anything"), json!({"pattern": "(unclosed"})).is_empty());
    }
}
