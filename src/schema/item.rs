//! The recursive schema node and its builder operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kind::Kind;
use crate::error::{ErrorKind, ValidationError};

/// One node of a validation schema tree.
///
/// An `Item` describes the shape and constraints of a single JSON value:
/// its [`Kind`], optional length and value bounds, enumerated values, and,
/// for composite kinds, the nested schemas (`fields` for structs, `base`
/// for arrays, pointers, and maps).
///
/// The serde representation is the canonical internal JSON form: snake_case
/// keys, numeric `type` codes, and absent keys for unset values. The
/// external, human-facing form (symbolic `type` names) is produced by
/// [`Item::to_json`] and accepted by [`Item::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// Field name when this node is embedded in a struct; empty otherwise.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// By-name reference to a struct schema in the dictionary. A non-empty
    /// alias makes this node a shell: only `kind` (Struct) and `alias` are
    /// meaningful.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alias: String,

    #[serde(rename = "type")]
    pub kind: Kind,

    /// Allowed scalar values, or allowed keys when `kind` is Map.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<String>,

    /// Child fields; only meaningful when `kind` is Struct.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Item>,

    /// Element or target schema for Array, Pointer, and Map nodes.
    #[serde(rename = "base_type", skip_serializing_if = "Option::is_none")]
    pub base: Option<Box<Item>>,

    #[serde(skip_serializing_if = "is_zero")]
    pub min_length: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_length: i32,

    /// Value bounds, kept as JSON scalars (a raw string when set from a tag,
    /// a number when derived from a native type) and coerced to the target
    /// primitive at check time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Value>,

    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,

    /// When set on a struct, JSON object keys not listed in `fields` are
    /// ignored rather than rejected.
    #[serde(skip_serializing_if = "is_false")]
    pub allow_foreign_key: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub has_min_length: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub has_max_length: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub has_min_value: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub has_max_value: bool,

    /// When set, enum comparisons are byte-exact; otherwise they are
    /// case-insensitive.
    #[serde(skip_serializing_if = "is_false")]
    pub case_sensitive: bool,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Item {
    /// Create a bare node of the given kind. The caller adds rules via the
    /// builder setters or [`Item::parse_tag`].
    pub fn new(kind: Kind) -> Item {
        Item {
            kind,
            ..Item::default()
        }
    }

    /// Create an alias shell referring to a named struct schema in the
    /// dictionary.
    pub fn alias(type_name: &str) -> Item {
        Item {
            kind: Kind::Struct,
            alias: type_name.to_string(),
            ..Item::default()
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Item {
        self.name = name.into();
        self
    }

    pub fn set_required(&mut self, required: bool) -> &mut Item {
        self.required = required;
        self
    }

    pub fn set_min_length(&mut self, length: i32) -> &mut Item {
        self.min_length = length;
        self.has_min_length = true;
        self
    }

    pub fn set_max_length(&mut self, length: i32) -> &mut Item {
        self.max_length = length;
        self.has_max_length = true;
        self
    }

    pub fn set_min_value(&mut self, value: impl Into<Value>) -> &mut Item {
        self.min_value = Some(value.into());
        self.has_min_value = true;
        self
    }

    pub fn set_max_value(&mut self, value: impl Into<Value>) -> &mut Item {
        self.max_value = Some(value.into());
        self.has_max_value = true;
        self
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) -> &mut Item {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn set_allow_foreign_key(&mut self, allow: bool) -> &mut Item {
        self.allow_foreign_key = allow;
        self
    }

    /// Replace the enumerated values with the rendered form of `values`.
    pub fn set_enums<T: fmt::Display>(&mut self, values: &[T]) -> &mut Item {
        self.enums = values.iter().map(|v| v.to_string()).collect();
        self
    }

    /// The base schema, or `NilValidator` when a composite node is missing
    /// one.
    pub(crate) fn base_item(&self) -> Result<&Item, ValidationError> {
        self.base
            .as_deref()
            .ok_or_else(|| ErrorKind::NilValidator.err().with_context(&self.name))
    }

    /// Structural self-check: every node must carry a known type, and a
    /// non-zero length bound must be accompanied by its presence flag.
    pub fn self_check(&self) -> Result<(), ValidationError> {
        if self.kind == Kind::Invalid {
            return Err(ErrorKind::InvalidValidator
                .err()
                .with_context("type")
                .with_value("missing or invalid type"));
        }

        if self.min_length > 0 && !self.has_min_length {
            return Err(ErrorKind::InvalidValidator
                .err()
                .with_context("HasMinLength")
                .with_value("non-zero minLength without hasMinLength"));
        }

        if self.max_length > 0 && !self.has_max_length {
            return Err(ErrorKind::InvalidValidator
                .err()
                .with_context("HasMaxLength")
                .with_value("non-zero maxLength without hasMaxLength"));
        }

        if let Some(base) = &self.base {
            base.self_check()?;
        }

        for field in &self.fields {
            field.self_check()?;
        }

        Ok(())
    }
}
