//! The closed type tag carried by every schema node.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Underlying datatype of a schema node. The tag determines which
/// validations apply to a JSON value matched against the node.
///
/// The numeric wire codes are stable; new kinds are only ever appended so
/// existing JSON representations of a schema keep their meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Kind {
    #[default]
    Invalid,
    String,
    Int,
    Float,
    Bool,
    Struct,
    Array,
    Pointer,
    /// An object whose keys are checked against the enum list and whose
    /// values are checked against the base schema.
    Map,
    Uuid,
    Time,
    /// Accepts any JSON value unconditionally.
    Any,
    /// A string carrying a comma-separated list of enumerated elements.
    List,
    Duration,
}

impl Kind {
    /// Stable numeric wire code used by the internal JSON presentation.
    pub const fn code(self) -> u8 {
        match self {
            Kind::Invalid => 0,
            Kind::String => 1,
            Kind::Int => 2,
            Kind::Float => 3,
            Kind::Bool => 4,
            Kind::Struct => 5,
            Kind::Array => 6,
            Kind::Pointer => 7,
            Kind::Map => 8,
            Kind::Uuid => 9,
            Kind::Time => 10,
            Kind::Any => 11,
            Kind::List => 12,
            Kind::Duration => 13,
        }
    }

    /// Resolve a numeric wire code back to a kind.
    pub fn from_code(code: u64) -> Option<Kind> {
        Some(match code {
            0 => Kind::Invalid,
            1 => Kind::String,
            2 => Kind::Int,
            3 => Kind::Float,
            4 => Kind::Bool,
            5 => Kind::Struct,
            6 => Kind::Array,
            7 => Kind::Pointer,
            8 => Kind::Map,
            9 => Kind::Uuid,
            10 => Kind::Time,
            11 => Kind::Any,
            12 => Kind::List,
            13 => Kind::Duration,
            _ => return None,
        })
    }

    /// Symbolic name used by the external JSON presentation and as the DSL
    /// reserved word.
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::String => "string",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Struct => "struct",
            Kind::Array => "array",
            Kind::Pointer => "pointer",
            Kind::Map => "map",
            Kind::Uuid => "uuid",
            Kind::Time => "time",
            Kind::Any => "any",
            Kind::List => "list",
            Kind::Duration => "duration",
        }
    }

    /// Resolve a symbolic name. Accepts the canonical names plus the
    /// `integer` alias; `invalid` is deliberately not a recognized spelling.
    pub fn from_name(name: &str) -> Option<Kind> {
        Some(match name {
            "string" => Kind::String,
            "int" | "integer" => Kind::Int,
            "float" => Kind::Float,
            "bool" => Kind::Bool,
            "struct" => Kind::Struct,
            "array" => Kind::Array,
            "pointer" => Kind::Pointer,
            "map" => Kind::Map,
            "uuid" => Kind::Uuid,
            "time" => Kind::Time,
            "any" => Kind::Any,
            "list" => Kind::List,
            "duration" => Kind::Duration,
            _ => return None,
        })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Kind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Kind, D::Error> {
        // Unknown codes map to Invalid so the structural self-check can
        // report them with proper context instead of a bare decode error.
        let code = u64::deserialize(deserializer)?;
        Ok(Kind::from_code(code).unwrap_or(Kind::Invalid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for code in 0..14 {
            let kind = Kind::from_code(code).unwrap();
            assert_eq!(u64::from(kind.code()), code);
        }
        assert_eq!(Kind::from_code(14), None);
        assert_eq!(Kind::from_code(255), None);
    }

    #[test]
    fn test_name_round_trip() {
        for kind in [
            Kind::String,
            Kind::Int,
            Kind::Float,
            Kind::Bool,
            Kind::Struct,
            Kind::Array,
            Kind::Pointer,
            Kind::Map,
            Kind::Uuid,
            Kind::Time,
            Kind::Any,
            Kind::List,
            Kind::Duration,
        ] {
            assert_eq!(Kind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_integer_alias() {
        assert_eq!(Kind::from_name("integer"), Some(Kind::Int));
    }

    #[test]
    fn test_invalid_not_a_name() {
        assert_eq!(Kind::from_name("invalid"), None);
        assert_eq!(Kind::from_name("strings"), None);
        assert_eq!(Kind::from_name(""), None);
    }

    #[test]
    fn test_serde_numeric() {
        let json = serde_json::to_string(&Kind::Pointer).unwrap();
        assert_eq!(json, "7");
        let back: Kind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Kind::Pointer);
    }

    #[test]
    fn test_unknown_code_deserializes_to_invalid() {
        let kind: Kind = serde_json::from_str("99").unwrap();
        assert_eq!(kind, Kind::Invalid);
    }
}
