//! Schema derivation from native types.
//!
//! Rust has no runtime reflection, so the derivation seam is the
//! [`Reflect`] trait: scalar and container types carry blanket
//! implementations here, and user structs get theirs from the
//! [`reflect_struct!`](crate::reflect_struct) macro, which also records
//! per-field tag strings the way a struct tag would.

mod macros;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ErrorKind, ValidationError};
use crate::schema::{dictionary, Item, Kind, ALIAS_PREFIX, MAX_DEPTH};

/// The default struct-tag name read at derivation time.
const DEFAULT_TAG_NAME: &str = "validate";

static TAG_NAME: RwLock<String> = RwLock::new(String::new());

/// Change which named tag the derivation reads from struct fields. Must be
/// called before the first schema is derived to take effect everywhere.
pub fn set_tag_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ErrorKind::InvalidTagName.err());
    }

    *TAG_NAME.write() = name.to_string();
    Ok(())
}

/// The currently configured tag name.
pub fn tag_name() -> String {
    let current = TAG_NAME.read();
    if current.is_empty() {
        DEFAULT_TAG_NAME.to_string()
    } else {
        current.clone()
    }
}

/// Types that can describe their own validation schema.
pub trait Reflect {
    /// Build the schema node for this type at the given recursion depth.
    fn reflect_at(depth: usize) -> Result<Item, ValidationError>;
}

/// Derive a schema from a native type without registering it.
pub fn new_from<T: Reflect>() -> Result<Item, ValidationError> {
    T::reflect_at(0)
}

/// Derive a schema from a native type and register it under a user name.
pub fn define<T: Reflect>(name: &str) -> Result<(), ValidationError> {
    let item = new_from::<T>()?;
    dictionary::define_item(name, item)
}

/// Validate JSON bytes against the schema derived from `T`, then bind them
/// into a `T`.
pub fn unmarshal<T>(data: &[u8]) -> Result<T, ValidationError>
where
    T: Reflect + serde::de::DeserializeOwned,
{
    let item = new_from::<T>()?;

    let text = std::str::from_utf8(data)
        .map_err(|e| ErrorKind::InvalidData.err().with_value(e))?;
    item.validate(text)?;

    serde_json::from_slice(data).map_err(|e| ErrorKind::InvalidData.err().with_value(e))
}

pub(crate) fn check_depth(depth: usize) -> Result<(), ValidationError> {
    if depth > MAX_DEPTH {
        return Err(ErrorKind::MaxDepthExceeded.err().with_value(depth));
    }
    Ok(())
}

/// Shared derivation path for named structs: an alias shell is stored
/// before the fields are built, so a recursive reference resolves to a
/// pure alias instead of diverging; the finished schema then replaces the
/// shell.
#[doc(hidden)]
pub fn build_struct_schema<F>(
    type_name: &str,
    depth: usize,
    build_fields: F,
) -> Result<Item, ValidationError>
where
    F: FnOnce(usize) -> Result<Vec<Item>, ValidationError>,
{
    check_depth(depth)?;

    let alias_key = format!("{ALIAS_PREFIX}{type_name}");

    if let Some(previous) = dictionary::find(&alias_key) {
        if !previous.alias.is_empty() {
            return Ok(Item::alias(type_name));
        }
    }

    dictionary::store(&alias_key, Item::alias(type_name));

    let mut item = Item::new(Kind::Struct);
    item.fields = build_fields(depth)?;

    dictionary::store(&alias_key, item.clone());

    Ok(item)
}

macro_rules! scalar_reflect {
    ($($ty:ty => $kind:expr),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn reflect_at(depth: usize) -> Result<Item, ValidationError> {
                    check_depth(depth)?;
                    Ok(Item::new($kind))
                }
            }
        )+
    };
}

scalar_reflect! {
    String => Kind::String,
    &str => Kind::String,
    bool => Kind::Bool,
    i64 => Kind::Int,
    isize => Kind::Int,
    f64 => Kind::Float,
    Value => Kind::Any,
    Uuid => Kind::Uuid,
    DateTime<Utc> => Kind::Time,
    DateTime<FixedOffset> => Kind::Time,
    std::time::Duration => Kind::Duration,
    chrono::Duration => Kind::Duration,
}

// Fixed-width integers carry their representable range as value bounds, so
// a JSON number outside the width is rejected rather than silently
// wrapped at bind time.
macro_rules! bounded_int_reflect {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn reflect_at(depth: usize) -> Result<Item, ValidationError> {
                    check_depth(depth)?;
                    let mut item = Item::new(Kind::Int);
                    item.set_min_value(<$ty>::MIN as i64)
                        .set_max_value(<$ty>::MAX as i64);
                    Ok(item)
                }
            }
        )+
    };
}

bounded_int_reflect!(i8, i16, i32, u8, u16, u32);

impl Reflect for f32 {
    fn reflect_at(depth: usize) -> Result<Item, ValidationError> {
        check_depth(depth)?;
        let mut item = Item::new(Kind::Float);
        item.set_min_value(-f64::from(f32::MAX))
            .set_max_value(f64::from(f32::MAX));
        Ok(item)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect_at(depth: usize) -> Result<Item, ValidationError> {
        check_depth(depth)?;
        let mut item = Item::new(Kind::Array);
        item.base = Some(Box::new(T::reflect_at(depth + 1)?));
        Ok(item)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect_at(depth: usize) -> Result<Item, ValidationError> {
        check_depth(depth)?;
        let mut item = Item::new(Kind::Array);
        item.base = Some(Box::new(T::reflect_at(depth + 1)?));
        Ok(item)
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect_at(depth: usize) -> Result<Item, ValidationError> {
        check_depth(depth)?;
        let mut item = Item::new(Kind::Pointer);
        item.base = Some(Box::new(T::reflect_at(depth + 1)?));
        Ok(item)
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn reflect_at(depth: usize) -> Result<Item, ValidationError> {
        T::reflect_at(depth)
    }
}

impl<V: Reflect> Reflect for HashMap<String, V> {
    fn reflect_at(depth: usize) -> Result<Item, ValidationError> {
        check_depth(depth)?;
        let mut item = Item::new(Kind::Map);
        item.base = Some(Box::new(V::reflect_at(depth + 1)?));
        Ok(item)
    }
}

impl<V: Reflect> Reflect for BTreeMap<String, V> {
    fn reflect_at(depth: usize) -> Result<Item, ValidationError> {
        check_depth(depth)?;
        let mut item = Item::new(Kind::Map);
        item.base = Some(Box::new(V::reflect_at(depth + 1)?));
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(new_from::<String>().unwrap().kind, Kind::String);
        assert_eq!(new_from::<bool>().unwrap().kind, Kind::Bool);
        assert_eq!(new_from::<i64>().unwrap().kind, Kind::Int);
        assert_eq!(new_from::<f64>().unwrap().kind, Kind::Float);
        assert_eq!(new_from::<Uuid>().unwrap().kind, Kind::Uuid);
        assert_eq!(new_from::<DateTime<Utc>>().unwrap().kind, Kind::Time);
        assert_eq!(new_from::<std::time::Duration>().unwrap().kind, Kind::Duration);
        assert_eq!(new_from::<Value>().unwrap().kind, Kind::Any);
    }

    #[test]
    fn test_width_bounds() {
        let item = new_from::<u8>().unwrap();
        assert_eq!(item.min_value, Some(Value::from(0)));
        assert_eq!(item.max_value, Some(Value::from(255)));

        let item = new_from::<i8>().unwrap();
        assert_eq!(item.min_value, Some(Value::from(-128)));
        assert_eq!(item.max_value, Some(Value::from(127)));

        let item = new_from::<u32>().unwrap();
        assert_eq!(item.max_value, Some(Value::from(4294967295i64)));

        let item = new_from::<i64>().unwrap();
        assert!(!item.has_min_value && !item.has_max_value);
    }

    #[test]
    fn test_f32_bounds() {
        let item = new_from::<f32>().unwrap();
        assert_eq!(item.kind, Kind::Float);
        assert!(item.has_min_value && item.has_max_value);
    }

    #[test]
    fn test_containers() {
        let item = new_from::<Vec<i64>>().unwrap();
        assert_eq!(item.kind, Kind::Array);
        assert_eq!(item.base.as_ref().unwrap().kind, Kind::Int);

        let item = new_from::<Option<String>>().unwrap();
        assert_eq!(item.kind, Kind::Pointer);
        assert_eq!(item.base.as_ref().unwrap().kind, Kind::String);

        let item = new_from::<HashMap<String, bool>>().unwrap();
        assert_eq!(item.kind, Kind::Map);
        assert_eq!(item.base.as_ref().unwrap().kind, Kind::Bool);

        let item = new_from::<Box<i64>>().unwrap();
        assert_eq!(item.kind, Kind::Int);
    }

    #[test]
    fn test_nested_containers() {
        let item = new_from::<Vec<Vec<String>>>().unwrap();
        assert_eq!(item.kind, Kind::Array);
        let inner = item.base.as_ref().unwrap();
        assert_eq!(inner.kind, Kind::Array);
        assert_eq!(inner.base.as_ref().unwrap().kind, Kind::String);
    }

    #[test]
    fn test_tag_name_default() {
        assert_eq!(tag_name(), "validate");
    }

    #[test]
    fn test_set_tag_name_rejects_empty() {
        let err = set_tag_name("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTagName);
    }
}
