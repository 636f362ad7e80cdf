//! The validator interpreter: a recursive walk of a parsed JSON value
//! against a schema [`Item`].
//!
//! Validation returns at the first failure; nothing is accumulated and
//! nothing is retried. Alias nodes are resolved through the dictionary to a
//! deep copy, so descent never holds the registry lock.

use serde_json::{Map, Value};

use crate::coerce;
use crate::coerce::display_value;
use crate::error::{ErrorKind, ValidationError};
use crate::schema::{dictionary, Item, Kind, ALIAS_PREFIX, MAX_DEPTH};

/// Look up a named schema in the dictionary and validate the JSON text
/// against it.
pub fn validate_by_name(name: &str, text: &str) -> Result<(), ValidationError> {
    match dictionary::find(name) {
        Some(item) => item.validate(text),
        None => Err(ErrorKind::UndefinedStructure.err().with_context(name)),
    }
}

impl Item {
    /// Validate a JSON document against this schema.
    pub fn validate(&self, text: &str) -> Result<(), ValidationError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ErrorKind::SyntaxError.err().with_value(e))?;

        self.validate_value(&value, 0)
    }

    /// Validate one parsed value at the given recursion depth.
    pub(crate) fn validate_value(&self, value: &Value, depth: usize) -> Result<(), ValidationError> {
        if depth > MAX_DEPTH {
            return Err(ErrorKind::MaxDepthExceeded.err().with_value(depth));
        }

        // Resolve an alias shell to a copy of the registered schema. An
        // unresolved alias validates as a plain struct with no fields.
        let resolved;
        let item = if self.alias.is_empty() {
            self
        } else {
            match dictionary::find(&format!("{ALIAS_PREFIX}{}", self.alias)) {
                Some(full) if full.kind == Kind::Struct && full.alias.is_empty() => {
                    resolved = full;
                    &resolved
                }
                _ => self,
            }
        };

        match item.kind {
            Kind::Any => Ok(()),

            Kind::Pointer => {
                // JSON null means "absent" for a nullable wrapper.
                if value.is_null() {
                    return Ok(());
                }
                item.base_item()?.validate_value(value, depth + 1)
            }

            Kind::Array => item.check_array(value, depth),
            Kind::Map => item.check_map(value, depth),
            Kind::Struct => item.check_struct(value, depth),

            Kind::Time => item.check_time(value),
            Kind::Duration => item.check_duration(value),
            Kind::Int => item.check_int(value),
            Kind::Float => item.check_float(value),
            Kind::String => item.check_string(value),
            Kind::List => item.check_list(value),

            Kind::Uuid => {
                coerce::uuid_value(value).map_err(|_| item.invalid_data(value))?;
                Ok(())
            }

            Kind::Bool => {
                coerce::bool_value(value).map_err(|_| item.invalid_data(value))?;
                Ok(())
            }

            Kind::Invalid => Err(ErrorKind::Unimplemented
                .err()
                .with_context(&item.name)
                .with_value(item.kind)),
        }
    }

    fn check_array(&self, value: &Value, depth: usize) -> Result<(), ValidationError> {
        let elements = value.as_array().ok_or_else(|| self.invalid_data(value))?;
        let count = elements.len() as i32;

        if self.has_min_length && count < self.min_length {
            return Err(ErrorKind::ArrayLengthOutOfRange
                .err()
                .with_context(&self.name)
                .with_value(count)
                .with_expected(&[self.min_length]));
        }

        if self.has_max_length && count > self.max_length {
            return Err(ErrorKind::ArrayLengthOutOfRange
                .err()
                .with_context(&self.name)
                .with_value(count)
                .with_expected(&[self.max_length]));
        }

        let base = self.base_item()?;
        for element in elements {
            base.validate_value(element, depth + 1)?;
        }

        Ok(())
    }

    fn check_map(&self, value: &Value, depth: usize) -> Result<(), ValidationError> {
        let entries = value.as_object().ok_or_else(|| self.invalid_data(value))?;
        let count = entries.len() as i32;

        if self.has_min_length && count < self.min_length {
            return Err(ErrorKind::ValueLengthOutOfRange
                .err()
                .with_context(&self.name)
                .with_value(count)
                .with_expected(&[self.min_length]));
        }

        if self.has_max_length && count > self.max_length {
            return Err(ErrorKind::ValueLengthOutOfRange
                .err()
                .with_context(&self.name)
                .with_value(count)
                .with_expected(&[self.max_length]));
        }

        for (key, entry) in entries {
            if !self.enums.is_empty() && !self.enum_match(key) {
                return Err(ErrorKind::InvalidEnumeratedValue
                    .err()
                    .with_context(&self.name)
                    .with_value(key)
                    .with_expected(&self.enums));
            }

            if let Some(base) = &self.base {
                base.validate_value(entry, depth + 1)?;
            }
        }

        Ok(())
    }

    fn check_struct(&self, value: &Value, depth: usize) -> Result<(), ValidationError> {
        // A one-element array of objects stands in for the object itself.
        let entries: &Map<String, Value> = match value {
            Value::Object(map) => map,
            Value::Array(elements) => match elements.first() {
                Some(Value::Object(map)) => map,
                _ => return Err(self.invalid_data(value)),
            },
            _ => return Err(self.invalid_data(value)),
        };

        if !self.allow_foreign_key {
            for key in entries.keys() {
                if !self.fields.iter().any(|field| field.name == *key) {
                    return Err(ErrorKind::InvalidFieldName
                        .err()
                        .with_context(&self.name)
                        .with_value(key));
                }
            }
        }

        for field in &self.fields {
            match entries.get(&field.name) {
                Some(entry) => field.validate_value(entry, depth + 1)?,
                None => {
                    if field.required {
                        return Err(ErrorKind::Required.err().with_value(&field.name));
                    }
                }
            }
        }

        Ok(())
    }

    fn check_time(&self, value: &Value) -> Result<(), ValidationError> {
        let time = coerce::time_value(value).map_err(|_| self.invalid_data(value))?;

        if self.has_min_value {
            if let Some(bound) = self.min_value.as_ref().and_then(|b| coerce::time_value(b).ok()) {
                if time < bound {
                    return Err(self.out_of_range(value));
                }
            }
        }

        if self.has_max_value {
            if let Some(bound) = self.max_value.as_ref().and_then(|b| coerce::time_value(b).ok()) {
                if time > bound {
                    return Err(self.out_of_range(value));
                }
            }
        }

        Ok(())
    }

    fn check_duration(&self, value: &Value) -> Result<(), ValidationError> {
        let duration = coerce::duration_value(value).map_err(|_| self.invalid_data(value))?;

        // Comparison is by whole milliseconds; sub-millisecond precision is
        // not significant for duration bounds.
        if self.has_min_value {
            if let Some(bound) = self
                .min_value
                .as_ref()
                .and_then(|b| coerce::duration_value(b).ok())
            {
                if duration.num_milliseconds() < bound.num_milliseconds() {
                    return Err(self.out_of_range(value));
                }
            }
        }

        if self.has_max_value {
            if let Some(bound) = self
                .max_value
                .as_ref()
                .and_then(|b| coerce::duration_value(b).ok())
            {
                if duration.num_milliseconds() > bound.num_milliseconds() {
                    return Err(self.out_of_range(value));
                }
            }
        }

        Ok(())
    }

    fn check_int(&self, value: &Value) -> Result<(), ValidationError> {
        let number = coerce::int_value(value).map_err(|_| self.invalid_data(value))?;

        if self.has_min_value {
            if let Some(bound) = self.min_value.as_ref().and_then(|b| coerce::int_value(b).ok()) {
                if number < bound {
                    return Err(ErrorKind::ValueOutOfRange
                        .err()
                        .with_context(&self.name)
                        .with_value(number));
                }
            }
        }

        if self.has_max_value {
            if let Some(bound) = self.max_value.as_ref().and_then(|b| coerce::int_value(b).ok()) {
                if number > bound {
                    return Err(ErrorKind::ValueOutOfRange
                        .err()
                        .with_context(&self.name)
                        .with_value(number));
                }
            }
        }

        if !self.enums.is_empty() {
            let found = self.enums.iter().any(|candidate| {
                coerce::int_from_str(candidate)
                    .map(|allowed| allowed == number)
                    .unwrap_or(false)
            });

            if !found {
                return Err(ErrorKind::InvalidEnumeratedValue
                    .err()
                    .with_context(&self.name)
                    .with_value(number)
                    .with_expected(&self.enums));
            }
        }

        Ok(())
    }

    fn check_float(&self, value: &Value) -> Result<(), ValidationError> {
        let number = coerce::float_value(value).map_err(|_| self.invalid_data(value))?;

        if self.has_min_value {
            if let Some(bound) = self.min_value.as_ref().and_then(|b| coerce::float_value(b).ok()) {
                if number < bound {
                    return Err(self.out_of_range(value));
                }
            }
        }

        if self.has_max_value {
            if let Some(bound) = self.max_value.as_ref().and_then(|b| coerce::float_value(b).ok()) {
                if number > bound {
                    return Err(self.out_of_range(value));
                }
            }
        }

        Ok(())
    }

    fn check_string(&self, value: &Value) -> Result<(), ValidationError> {
        let text = coerce::string_value(value).map_err(|_| self.invalid_data(value))?;
        let count = text.chars().count() as i32;

        if self.has_min_length && count < self.min_length {
            return Err(ErrorKind::ValueLengthOutOfRange
                .err()
                .with_context(&self.name)
                .with_value(&text));
        }

        if self.has_max_length && count > self.max_length {
            return Err(ErrorKind::ValueLengthOutOfRange
                .err()
                .with_context(&self.name)
                .with_value(&text));
        }

        if !self.enums.is_empty() && !self.enum_match(&text) {
            return Err(ErrorKind::InvalidEnumeratedValue
                .err()
                .with_context(&self.name)
                .with_value(&text)
                .with_expected(&self.enums));
        }

        Ok(())
    }

    fn check_list(&self, value: &Value) -> Result<(), ValidationError> {
        let text = coerce::string_value(value).map_err(|_| self.invalid_data(value))?;

        // The list value is a single string; the only separator is a comma,
        // and length bounds count elements rather than characters.
        let elements: Vec<&str> = text.split(',').collect();
        let count = elements.len() as i32;

        if self.has_min_length && count < self.min_length {
            return Err(ErrorKind::ValueLengthOutOfRange
                .err()
                .with_context(&self.name)
                .with_value(&text));
        }

        if self.has_max_length && count > self.max_length {
            return Err(ErrorKind::ValueLengthOutOfRange
                .err()
                .with_context(&self.name)
                .with_value(&text));
        }

        if !self.enums.is_empty() {
            for element in elements {
                let element = element.trim();
                if !self.enum_match(element) {
                    return Err(ErrorKind::InvalidEnumeratedValue
                        .err()
                        .with_context(&self.name)
                        .with_value(element)
                        .with_expected(&self.enums));
                }
            }
        }

        Ok(())
    }

    /// Enum membership under the node's case rule: byte-exact when case
    /// sensitive, Unicode-folded otherwise.
    fn enum_match(&self, candidate: &str) -> bool {
        if self.case_sensitive {
            self.enums.iter().any(|allowed| allowed == candidate)
        } else {
            let folded = candidate.to_lowercase();
            self.enums
                .iter()
                .any(|allowed| allowed.to_lowercase() == folded)
        }
    }

    fn invalid_data(&self, value: &Value) -> ValidationError {
        ErrorKind::InvalidData
            .err()
            .with_context(&self.name)
            .with_value(display_value(value))
    }

    fn out_of_range(&self, value: &Value) -> ValidationError {
        ErrorKind::ValueOutOfRange
            .err()
            .with_context(&self.name)
            .with_value(display_value(value))
    }
}
