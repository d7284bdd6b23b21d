//! Result and lookup types shared across the validator.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Result of looking a value up in a container.
///
/// The engine distinguishes three states: the key/index does not exist at all
/// (`Absent`), it exists and maps to JSON null (`Present(Value::Null)`), or it
/// exists and maps to some other value. Only `Absent` triggers the
/// missing/optional check; a present null is exempt from all scalar and
/// structural constraint checks but still participates in type matching.
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    /// The key or index was never supplied.
    Absent,
    /// The key or index exists and maps to this value (possibly `Value::Null`).
    Present(&'a Value),
}

impl<'a> Slot<'a> {
    /// Build a slot from a container lookup result.
    pub fn of(lookup: Option<&'a Value>) -> Self {
        match lookup {
            Some(v) => Slot::Present(v),
            None => Slot::Absent,
        }
    }

    /// True if no value was supplied at all.
    pub fn is_absent(&self) -> bool {
        matches!(self, Slot::Absent)
    }

    /// True only for a value that is present and explicitly null.
    pub fn is_null(&self) -> bool {
        matches!(self, Slot::Present(Value::Null))
    }

    /// The supplied value, if any.
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Slot::Present(v) => Some(v),
            Slot::Absent => None,
        }
    }
}

/// One validation violation: the path to the offending value and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path to the violating value, e.g. `$user.tags[2]`. Empty at the root.
    pub property: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationError {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.message)
    }
}

/// Outcome of one `validate` or `check_property_change` call.
///
/// Valid iff the error list is empty. Errors are kept in traversal order and
/// are never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// True if validation produced no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The ordered list of violations.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes self and returns the inner error list.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Converts into a `Result`, turning a non-empty error list into a
    /// [`ValidationFailure`].
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure {
                errors: self.errors,
            })
        }
    }
}

/// Error form of an invalid [`ValidationResult`], for callers that want to
/// propagate invalidity with `?`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("instance failed validation:\n{}", format_errors(.errors))]
pub struct ValidationFailure {
    errors: Vec<ValidationError>,
}

impl ValidationFailure {
    /// The ordered list of violations.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
