//! Coercion of generic JSON values into typed primitives.
//!
//! Each target type has a fixed acceptance table; anything outside it is
//! `InvalidData`. Schema value bounds are kept as JSON scalars, so the same
//! functions serve both document values and bound values.

mod duration;
mod time;

use chrono::{DateTime, Duration, FixedOffset};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ErrorKind, ValidationError};

pub use duration::parse_duration;
pub use time::parse_time;

/// Render a JSON value the way error messages expect: strings bare, other
/// values in their JSON form.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepts a bool, or the strings `true`/`false` in any case.
pub fn bool_value(value: &Value) -> Result<bool, ValidationError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(invalid(value)),
        },
        _ => Err(invalid(value)),
    }
}

/// Accepts an integer, a float (truncated), or a decimal string parseable
/// as a signed 32-bit value.
pub fn int_value(value: &Value) -> Result<i64, ValidationError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                Ok(f.trunc() as i64)
            } else {
                Err(invalid(value))
            }
        }
        Value::String(s) => int_from_str(s).map_err(|_| invalid(value)),
        _ => Err(invalid(value)),
    }
}

/// Parse a decimal string as a signed 32-bit integer.
pub fn int_from_str(text: &str) -> Result<i64, ValidationError> {
    text.trim()
        .parse::<i32>()
        .map(i64::from)
        .map_err(|_| ErrorKind::InvalidData.err().with_value(text))
}

/// Accepts a float, an integer, or a decimal string.
pub fn float_value(value: &Value) -> Result<f64, ValidationError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(value)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(value)),
        _ => Err(invalid(value)),
    }
}

/// Accepts a string, or a number (rendered with six decimal places, the
/// way a float is conventionally formatted).
pub fn string_value(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) => Ok(format!("{f:.6}")),
            None => Err(invalid(value)),
        },
        _ => Err(invalid(value)),
    }
}

/// Accepts a string in any layout the permissive date parser understands.
pub fn time_value(value: &Value) -> Result<DateTime<FixedOffset>, ValidationError> {
    match value {
        Value::String(s) => parse_time(s).map_err(|_| invalid(value)),
        _ => Err(invalid(value)),
    }
}

/// Accepts a string in the duration grammar (including the `d` extension).
pub fn duration_value(value: &Value) -> Result<Duration, ValidationError> {
    match value {
        Value::String(s) => parse_duration(s).map_err(|_| invalid(value)),
        _ => Err(invalid(value)),
    }
}

/// Accepts a canonical UUID string (the empty string means the nil UUID)
/// or an array of exactly 16 byte values.
pub fn uuid_value(value: &Value) -> Result<Uuid, ValidationError> {
    match value {
        Value::String(s) => {
            if s.is_empty() {
                return Ok(Uuid::nil());
            }
            Uuid::parse_str(s).map_err(|_| invalid(value))
        }
        Value::Array(elements) => {
            let mut bytes = Vec::with_capacity(elements.len());
            for element in elements {
                match element.as_u64() {
                    Some(b) if b <= 255 => bytes.push(b as u8),
                    _ => return Err(invalid(value)),
                }
            }
            Uuid::from_slice(&bytes).map_err(|_| invalid(value))
        }
        _ => Err(invalid(value)),
    }
}

fn invalid(value: &Value) -> ValidationError {
    ErrorKind::InvalidData.err().with_value(display_value(value))
}
