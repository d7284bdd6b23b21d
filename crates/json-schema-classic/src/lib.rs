//! Validator for the classic, pre-draft JSON Schema dialect.
//!
//! This crate checks an already-parsed [`serde_json::Value`] tree against a
//! constraint document using the early keyword set: `type`, `properties`,
//! `items`, `pattern`, `enum`, `extends`, `requires`, `additionalProperties`,
//! `disallow`, `readonly`, `optional`, `minimum`/`maximum`,
//! `minLength`/`maxLength`, `minItems`/`maxItems`, and `maxDecimal`.
//!
//! Validation never fails with an `Err`: every violation, including a
//! malformed schema node, is an entry in the returned ordered error list.
//!
//! # Example
//!
//! ```
//! use json_schema_classic::validate;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "properties": {
//!         "name": {"type": "string"},
//!         "age": {"type": "integer", "minimum": 0, "maximum": 125},
//!         "nickname": {"type": "string", "optional": true}
//!     }
//! });
//!
//! let result = validate(&json!({"name": "Ada", "age": 36}), Some(&schema));
//! assert!(result.is_valid());
//!
//! let result = validate(&json!({"name": "Ada", "age": 150}), Some(&schema));
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].property, "$age");
//! assert_eq!(result.errors()[0].message, "must have a maximum value of 125");
//! ```

mod checker;

mod matcher;
pub use matcher::{guess_type, matches_type};

mod schema;
pub use schema::{Items, SchemaEntry, SchemaNode, TypeSpec};

mod types;
pub use types::{Slot, ValidationError, ValidationFailure, ValidationResult};

mod validator;
pub use validator::{check_property_change, validate};
