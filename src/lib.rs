//! Declarative JSON validation.
//!
//! A schema — derived from a native type, compiled from a small text DSL,
//! or deserialized from canonical JSON — describes the shape and
//! constraints of a value: required fields, length and value bounds,
//! enumerations, case rules, element types of arrays, key and value rules
//! of maps. Validation walks a parsed JSON document against the schema and
//! reports the first violation as a structured [`ValidationError`].
//!
//! The three entry points:
//!
//! ```
//! use conform::{compile, new_from, Item};
//!
//! // 1. Compile the DSL.
//! let schema = compile("int: minvalue=1, maxvalue=10").unwrap();
//! assert!(schema.validate("9").is_ok());
//! assert!(schema.validate("42").is_err());
//!
//! // 2. Derive from a native type.
//! conform::reflect_struct! {
//!     #[derive(Debug, Default)]
//!     struct Point {
//!         x: i64 [validate = "required"],
//!         y: i64 [validate = "required"],
//!     }
//! }
//! let schema = new_from::<Point>().unwrap();
//! assert!(schema.validate(r#"{"x": 1, "y": 2}"#).is_ok());
//!
//! // 3. Round-trip the schema through its JSON form.
//! let rebuilt = Item::from_json(schema.to_json().as_bytes()).unwrap();
//! assert_eq!(schema, rebuilt);
//! ```
//!
//! Recursive schemas are handled by name aliases through a process-wide
//! dictionary; a shared depth budget bounds both derivation and
//! validation. See [`define`] and [`validate_by_name`] for the named
//! registry surface.

pub mod coerce;
pub mod dsl;
pub mod error;
pub mod reflect;
pub mod schema;
pub mod validate;

pub use crate::dsl::compile;
pub use crate::error::{ErrorKind, ValidationError};
pub use crate::reflect::{define, new_from, set_tag_name, unmarshal, Reflect};
pub use crate::schema::{define_item, Item, Kind};
pub use crate::validate::validate_by_name;
