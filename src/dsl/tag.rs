//! The comma-separated tag sublanguage.
//!
//! A tag string such as `required, minlength=5, enum=red|green|blue,
//! matchcase` refines an existing schema node. Tags are attached after `:`
//! in the DSL, or carried by struct fields in the reflection macro.

use serde_json::Value;

use crate::error::{ErrorKind, ValidationError};
use crate::schema::{Item, Kind};

impl Item {
    /// Apply a tag string to this node.
    ///
    /// Parts are separated by commas; commas inside single quotes or
    /// balanced parentheses do not separate. Each part is a bare keyword or
    /// a `key=value` pair; key names are case-insensitive.
    pub fn parse_tag(&mut self, tag: &str) -> Result<(), ValidationError> {
        for part in split_parts(tag) {
            let part = part.trim();
            if part.is_empty() {
                return Err(ErrorKind::EmptyTag.err());
            }

            let (key, value) = match part.split_once('=') {
                Some((k, v)) => {
                    let value = v.trim();
                    let key = k.trim().to_lowercase();
                    if value.is_empty() {
                        return Err(ErrorKind::EmptyTagValue.err().with_context(key));
                    }
                    (key, value)
                }
                None => (part.to_lowercase(), ""),
            };

            self.apply_keyword(&key, value)?;
        }

        Ok(())
    }

    fn apply_keyword(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        match key {
            "required" => {
                self.required = true;
            }

            "name" => {
                self.name = value.to_string();
            }

            "minlength" | "minlen" => {
                self.has_min_length = true;
                self.min_length = parse_length(key, value)?;
            }

            "maxlength" | "maxlen" => {
                self.has_max_length = true;
                self.max_length = parse_length(key, value)?;
            }

            "minvalue" | "min" => {
                self.has_min_value = true;
                self.min_value = Some(Value::String(value.to_string()));
            }

            "maxvalue" | "max" => {
                self.has_max_value = true;
                self.max_value = Some(Value::String(value.to_string()));
            }

            "enum" | "enums" => {
                if self.rejects_enums() {
                    return Err(ErrorKind::InvalidEnumType
                        .err()
                        .with_context(key)
                        .with_value(self.kind));
                }
                self.enums = enum_list(key, value)?;
            }

            "key" => {
                if self.kind != Kind::Map {
                    return Err(ErrorKind::NotAMap.err().with_context(key));
                }
                self.enums = enum_list(key, value)?;
            }

            "matchcase" | "casesensitive" => {
                self.case_sensitive = true;
            }

            "list" => {
                if self.kind != Kind::String {
                    return Err(ErrorKind::InvalidListTag.err().with_context(key));
                }
                self.kind = Kind::List;
            }

            "type" => {
                self.apply_type_override(key, value)?;
            }

            "base" | "value" => {
                let inner = unwrap_value(value).to_string();
                let target = self.base_tag_target(key)?;
                target.parse_tag(&inner)?;
            }

            _ => {
                return Err(ErrorKind::InvalidKeyword.err().with_value(key));
            }
        }

        Ok(())
    }

    /// Enumerations are meaningless on booleans and on struct shapes.
    fn rejects_enums(&self) -> bool {
        match self.kind {
            Kind::Bool | Kind::Struct => true,
            Kind::Pointer => self
                .base
                .as_ref()
                .is_some_and(|base| base.kind == Kind::Struct),
            _ => false,
        }
    }

    fn apply_type_override(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        let kind = match value {
            "string" => Kind::String,
            "integer" => Kind::Int,
            "float" => Kind::Float,
            "bool" => Kind::Bool,
            "array" => Kind::Array,
            "struct" => Kind::Struct,
            "pointer" => Kind::Pointer,
            "map" => Kind::Map,
            _ => {
                return Err(ErrorKind::UnsupportedType
                    .err()
                    .with_context(key)
                    .with_value(value));
            }
        };

        self.kind = kind;

        // Composite overrides start out accepting anything; a base tag can
        // refine the element schema afterwards.
        if matches!(kind, Kind::Array | Kind::Pointer | Kind::Map) {
            self.base = Some(Box::new(Item::new(Kind::Any)));
        }

        Ok(())
    }

    /// The node a `base=` tag applies to: the base schema, or the base's
    /// base when the base is itself an array or pointer wrapper.
    fn base_tag_target(&mut self, key: &str) -> Result<&mut Item, ValidationError> {
        let base = match self.base.as_deref_mut() {
            Some(base) => base,
            None => return Err(ErrorKind::InvalidBaseTag.err().with_context(key)),
        };

        if matches!(base.kind, Kind::Array | Kind::Pointer) && base.base.is_some() {
            return Ok(base.base.as_deref_mut().unwrap());
        }

        Ok(base)
    }
}

/// Split a tag string on commas, honoring single quotes and balanced
/// parentheses.
fn split_parts(tag: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quoted = false;

    for ch in tag.chars() {
        match ch {
            '\'' => {
                quoted = !quoted;
                current.push(ch);
            }
            '(' if !quoted => {
                depth += 1;
                current.push(ch);
            }
            ')' if !quoted => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if !quoted && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }

    parts.push(current);
    parts
}

/// Strip one layer of surrounding parentheses or single quotes.
fn unwrap_value(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.len() >= 2
        && ((trimmed.starts_with('(') && trimmed.ends_with(')'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        return &trimmed[1..trimmed.len() - 1];
    }
    trimmed
}

/// Parse an enumeration value list. Wrapped values (`(...)` or `'...'`)
/// split on commas; bare values split on the pipe character.
fn enum_list(key: &str, value: &str) -> Result<Vec<String>, ValidationError> {
    let trimmed = value.trim();
    let wrapped = trimmed.len() >= 2
        && ((trimmed.starts_with('(') && trimmed.ends_with(')'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));

    let (body, separator) = if wrapped {
        (&trimmed[1..trimmed.len() - 1], ',')
    } else {
        (trimmed, '|')
    };

    let values: Vec<String> = body
        .split(separator)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();

    if values.is_empty() {
        return Err(ErrorKind::MissingEnumValue.err().with_context(key));
    }

    Ok(values)
}

fn parse_length(key: &str, value: &str) -> Result<i32, ValidationError> {
    value.trim().parse::<i32>().map_err(|_| {
        ErrorKind::InvalidInteger
            .err()
            .with_context(key)
            .with_value(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_keywords() {
        let mut item = Item::new(Kind::String);
        item.parse_tag("required").unwrap();
        assert!(item.required);

        let mut item = Item::new(Kind::String);
        item.parse_tag("matchcase").unwrap();
        assert!(item.case_sensitive);
    }

    #[test]
    fn test_lengths() {
        let mut item = Item::new(Kind::String);
        item.parse_tag("required,minlength=1,maxlength=20").unwrap();
        assert!(item.required);
        assert_eq!((item.min_length, item.max_length), (1, 20));
        assert!(item.has_min_length && item.has_max_length);
    }

    #[test]
    fn test_length_aliases() {
        let mut item = Item::new(Kind::String);
        item.parse_tag("minlen=2, maxlen=4").unwrap();
        assert_eq!((item.min_length, item.max_length), (2, 4));
    }

    #[test]
    fn test_bad_length() {
        let mut item = Item::new(Kind::String);
        let err = item.parse_tag("required,minlength=bogus").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"invalid integer value, in minlength: "bogus""#
        );
    }

    #[test]
    fn test_values_stored_raw() {
        let mut item = Item::new(Kind::Int);
        item.parse_tag("min=18,max=65").unwrap();
        assert_eq!(item.min_value, Some(Value::String("18".into())));
        assert_eq!(item.max_value, Some(Value::String("65".into())));
        assert!(item.has_min_value && item.has_max_value);
    }

    #[test]
    fn test_enum_pipe_separated() {
        let mut item = Item::new(Kind::String);
        item.parse_tag("enum=red|blue|green").unwrap();
        assert_eq!(item.enums, vec!["red", "blue", "green"]);
    }

    #[test]
    fn test_enum_parenthesized_commas() {
        let mut item = Item::new(Kind::String);
        item.parse_tag("enum=(red, blue, green)").unwrap();
        assert_eq!(item.enums, vec!["red", "blue", "green"]);
    }

    #[test]
    fn test_enum_quoted_commas() {
        let mut item = Item::new(Kind::String);
        item.parse_tag("enum='red,blue'").unwrap();
        assert_eq!(item.enums, vec!["red", "blue"]);
    }

    #[test]
    fn test_enum_rejected_on_bool() {
        let mut item = Item::new(Kind::Bool);
        let err = item.parse_tag("enum=true|false").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnumType);
    }

    #[test]
    fn test_enum_rejected_on_pointer_to_struct() {
        let mut item = Item::new(Kind::Pointer);
        item.base = Some(Box::new(Item::new(Kind::Struct)));
        let err = item.parse_tag("enum=a|b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnumType);
    }

    #[test]
    fn test_enum_allowed_on_int() {
        let mut item = Item::new(Kind::Int);
        item.parse_tag("enum=1|2|3").unwrap();
        assert_eq!(item.enums, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_key_requires_map() {
        let mut item = Item::new(Kind::String);
        let err = item.parse_tag("key=a|b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAMap);

        let mut item = Item::new(Kind::Map);
        item.base = Some(Box::new(Item::new(Kind::Any)));
        item.parse_tag("key=key1|key2").unwrap();
        assert_eq!(item.enums, vec!["key1", "key2"]);
    }

    #[test]
    fn test_list_requires_string() {
        let mut item = Item::new(Kind::Int);
        let err = item.parse_tag("list").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidListTag);

        let mut item = Item::new(Kind::String);
        item.parse_tag("list,enum=red|green|blue").unwrap();
        assert_eq!(item.kind, Kind::List);
    }

    #[test]
    fn test_type_override() {
        let mut item = Item::new(Kind::String);
        item.parse_tag("type=integer").unwrap();
        assert_eq!(item.kind, Kind::Int);
    }

    #[test]
    fn test_type_override_composite_initializes_base() {
        let mut item = Item::new(Kind::String);
        item.parse_tag("type=array").unwrap();
        assert_eq!(item.kind, Kind::Array);
        assert_eq!(item.base.as_ref().unwrap().kind, Kind::Any);
    }

    #[test]
    fn test_type_override_unknown() {
        let mut item = Item::new(Kind::String);
        let err = item.parse_tag("type=number").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn test_base_tag_applies_to_base() {
        let mut item = Item::new(Kind::Array);
        item.base = Some(Box::new(Item::new(Kind::Int)));
        item.parse_tag("base=(minvalue=1, maxvalue=10)").unwrap();

        let base = item.base.as_ref().unwrap();
        assert_eq!(base.min_value, Some(Value::String("1".into())));
        assert_eq!(base.max_value, Some(Value::String("10".into())));
    }

    #[test]
    fn test_base_tag_reaches_through_wrapper() {
        let mut inner = Item::new(Kind::Array);
        inner.base = Some(Box::new(Item::new(Kind::Int)));
        let mut item = Item::new(Kind::Pointer);
        item.base = Some(Box::new(inner));

        item.parse_tag("base='min=1'").unwrap();

        let target = item.base.as_ref().unwrap().base.as_ref().unwrap();
        assert!(target.has_min_value);
    }

    #[test]
    fn test_base_tag_without_base() {
        let mut item = Item::new(Kind::Int);
        let err = item.parse_tag("base='min=1'").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBaseTag);
    }

    #[test]
    fn test_empty_tag() {
        let mut item = Item::new(Kind::String);
        assert_eq!(item.parse_tag("").unwrap_err().kind(), ErrorKind::EmptyTag);
        assert_eq!(
            item.parse_tag("required,,minlength=1").unwrap_err().kind(),
            ErrorKind::EmptyTag
        );
    }

    #[test]
    fn test_empty_tag_value_checked_before_keyword() {
        let mut item = Item::new(Kind::String);
        let err = item.parse_tag("bogus=").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyTagValue);
        assert_eq!(err.context(), "bogus");
    }

    #[test]
    fn test_empty_enum_value() {
        let mut item = Item::new(Kind::String);
        let err = item.parse_tag("enum=,required").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyTagValue);
        assert_eq!(err.context(), "enum");
    }

    #[test]
    fn test_invalid_keyword() {
        let mut item = Item::new(Kind::Int);
        let err = item.parse_tag("omit=true").unwrap_err();
        assert_eq!(err.to_string(), r#"invalid keyword: "omit""#);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut item = Item::new(Kind::String);
        item.parse_tag("Required, MINLENGTH=3").unwrap();
        assert!(item.required);
        assert_eq!(item.min_length, 3);
    }

    #[test]
    fn test_name_keyword() {
        let mut item = Item::new(Kind::Int);
        item.parse_tag("name=age").unwrap();
        assert_eq!(item.name, "age");
    }

    #[test]
    fn test_tokenized_tag_text() {
        // Tag text reassembled from DSL tokens carries spaces around
        // every token.
        let mut item = Item::new(Kind::Int);
        item.parse_tag("required , minvalue = 1 , maxvalue = 10 ").unwrap();
        assert!(item.required);
        assert_eq!(item.min_value, Some(Value::String("1".into())));
        assert_eq!(item.max_value, Some(Value::String("10".into())));
    }
}
