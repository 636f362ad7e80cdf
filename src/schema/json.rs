//! Canonical JSON (de)serialization of schemas.
//!
//! Two presentations exist: the external, human-facing form where the
//! `type` key is a symbolic name, and the internal form where it is the
//! numeric wire code. [`Item::from_json`] accepts either; [`Item::to_json`]
//! always emits the external form.

use serde_json::Value;

use super::item::Item;
use super::kind::Kind;
use crate::error::{ErrorKind, ValidationError};

/// Every key a schema object may carry.
const FIELD_KEYS: &[&str] = &[
    "name",
    "alias",
    "type",
    "enums",
    "fields",
    "base_type",
    "min_length",
    "max_length",
    "min_value",
    "max_value",
    "required",
    "allow_foreign_key",
    "has_min_length",
    "has_max_length",
    "has_min_value",
    "has_max_value",
    "case_sensitive",
];

impl Item {
    /// Render the schema as pretty-printed JSON in the external
    /// presentation (symbolic `type` names).
    pub fn to_json(&self) -> String {
        let mut tree = serde_json::to_value(self).unwrap_or(Value::Null);
        symbolize(&mut tree);
        serde_json::to_string_pretty(&tree).unwrap_or_default()
    }

    /// Rebuild a schema from its JSON representation, accepting either the
    /// symbolic or the numeric `type` presentation.
    ///
    /// Every object key must be a recognized schema field and every
    /// symbolic type name must resolve; the decoded tree is then run
    /// through the structural self-check.
    pub fn from_json(data: &[u8]) -> Result<Item, ValidationError> {
        let mut tree: Value = serde_json::from_slice(data)
            .map_err(|e| ErrorKind::SyntaxError.err().with_value(e))?;

        normalize(&mut tree)?;

        let item: Item = serde_json::from_value(tree)
            .map_err(|e| ErrorKind::InvalidValidator.err().with_value(e))?;

        item.self_check()?;

        Ok(item)
    }
}

/// Rewrite every numeric `type` value in the tree to its symbolic name.
fn symbolize(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if key == "type" {
                    if let Some(kind) = entry.as_u64().and_then(Kind::from_code) {
                        *entry = Value::String(kind.name().to_string());
                    }
                } else {
                    symbolize(entry);
                }
            }
        }
        Value::Array(elements) => {
            for element in elements {
                symbolize(element);
            }
        }
        _ => {}
    }
}

/// Verify object keys and rewrite symbolic `type` names to numeric codes.
fn normalize(value: &mut Value) -> Result<(), ValidationError> {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if !FIELD_KEYS.contains(&key.as_str()) {
                    return Err(ErrorKind::InvalidValidator
                        .err()
                        .with_context(key.as_str())
                        .with_value("invalid field name"));
                }

                if key == "type" {
                    if let Value::String(name) = entry {
                        match Kind::from_name(name) {
                            Some(kind) => *entry = Value::from(kind.code()),
                            None => {
                                return Err(ErrorKind::InvalidValidator
                                    .err()
                                    .with_context("type")
                                    .with_value("missing or invalid type"));
                            }
                        }
                    }
                } else {
                    normalize(entry)?;
                }
            }
        }
        Value::Array(elements) => {
            for element in elements {
                normalize(element)?;
            }
        }
        _ => {}
    }

    Ok(())
}
