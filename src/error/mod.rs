//! Validation error type with fluent context refinement.

use std::fmt;

use thiserror::Error;

/// Base classification of a validation failure.
///
/// The message text of each variant is the stable, human-readable prefix of
/// the rendered error; context, offending value, and expected values are
/// appended by [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("array length out of range")]
    ArrayLengthOutOfRange,
    #[error("empty tag")]
    EmptyTag,
    #[error("empty tag value")]
    EmptyTagValue,
    #[error("invalid base tag (only allowed on arrays, pointers, and maps)")]
    InvalidBaseTag,
    #[error("invalid data")]
    InvalidData,
    #[error("invalid duration value")]
    InvalidDuration,
    #[error("invalid enumerated value")]
    InvalidEnumeratedValue,
    #[error("invalid field type for enum, must be string or int")]
    InvalidEnumType,
    #[error("invalid field name")]
    InvalidFieldName,
    #[error("invalid integer value")]
    InvalidInteger,
    #[error("invalid keyword")]
    InvalidKeyword,
    #[error("invalid list tag for item type")]
    InvalidListTag,
    #[error("invalid name")]
    InvalidName,
    #[error("invalid tag name")]
    InvalidTagName,
    #[error("invalid JSON instance of validator")]
    InvalidValidator,
    #[error("maximum validation depth exceeded")]
    MaxDepthExceeded,
    #[error("missing enum values")]
    MissingEnumValue,
    #[error("name already exists")]
    NameAlreadyExists,
    #[error("nil validator")]
    NilValidator,
    #[error("keyword only valid with map type")]
    NotAMap,
    #[error("required field missing")]
    Required,
    #[error("syntax error")]
    SyntaxError,
    #[error("undefined structure")]
    UndefinedStructure,
    #[error("unimplemented type")]
    Unimplemented,
    #[error("unsupported type")]
    UnsupportedType,
    #[error("value out of range")]
    ValueOutOfRange,
    #[error("value length out of range")]
    ValueLengthOutOfRange,
}

impl ErrorKind {
    /// Wrap the kind in a bare [`ValidationError`], ready for refinement.
    pub fn err(self) -> ValidationError {
        ValidationError::new(self)
    }
}

/// A single validation failure.
///
/// Carries the base [`ErrorKind`] plus optional refinement: the context where
/// the failure occurred (a field name or source position), the offending
/// value, and the expected value(s). Refinement methods are chainable and
/// consuming, so predefined kinds can be specialized at the point of failure:
///
/// ```
/// use conform::ErrorKind;
///
/// let err = ErrorKind::ValueOutOfRange.err().with_context("age").with_value(75);
/// assert_eq!(err.to_string(), r#"value out of range, in age: "75""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    kind: ErrorKind,
    context: String,
    value: String,
    expected: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind) -> Self {
        ValidationError {
            kind,
            context: String::new(),
            value: String::new(),
            expected: String::new(),
        }
    }

    /// The base classification of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The context (field name or source position), if any.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The offending value rendered as text, if any.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the context of the error (usually a field name or a source
    /// location).
    pub fn with_context(mut self, context: impl fmt::Display) -> Self {
        self.context = context.to_string();
        self
    }

    /// Attach the offending value.
    pub fn with_value(mut self, value: impl fmt::Display) -> Self {
        self.value = value.to_string();
        self
    }

    /// Attach the expected value(s). When more than one value is given the
    /// rendered list is prefixed with `one of`.
    pub fn with_expected<T: fmt::Display>(mut self, expected: &[T]) -> Self {
        let list: Vec<String> = expected.iter().map(|v| v.to_string()).collect();
        self.expected = list.join(", ");
        if list.len() > 1 {
            self.expected = format!("one of {}", self.expected);
        }
        self
    }
}

impl From<ErrorKind> for ValidationError {
    fn from(kind: ErrorKind) -> Self {
        ValidationError::new(kind)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.context.is_empty() {
            write!(f, ", in {}", self.context)?;
        }
        if !self.value.is_empty() {
            write!(f, ": {:?}", self.value)?;
        }
        if !self.expected.is_empty() {
            write!(f, ", expected {}", self.expected)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_kind_rendering() {
        assert_eq!(
            ErrorKind::Required.err().to_string(),
            "required field missing"
        );
        assert_eq!(ErrorKind::EmptyTag.err().to_string(), "empty tag");
    }

    #[test]
    fn test_context_and_value() {
        let err = ErrorKind::InvalidData.err().with_context("wait").with_value("Yesterday");
        assert_eq!(err.to_string(), r#"invalid data, in wait: "Yesterday""#);
    }

    #[test]
    fn test_value_only() {
        let err = ErrorKind::Required.err().with_value("city");
        assert_eq!(err.to_string(), r#"required field missing: "city""#);
    }

    #[test]
    fn test_expected_single() {
        let err = ErrorKind::ArrayLengthOutOfRange
            .err()
            .with_context("staff")
            .with_value(0)
            .with_expected(&[1]);
        assert_eq!(
            err.to_string(),
            r#"array length out of range, in staff: "0", expected 1"#
        );
    }

    #[test]
    fn test_expected_list() {
        let err = ErrorKind::InvalidEnumeratedValue
            .err()
            .with_context("division")
            .with_value("Science")
            .with_expected(&["HR", "Finance", "Marketing", "Engineering"]);
        assert_eq!(
            err.to_string(),
            r#"invalid enumerated value, in division: "Science", expected one of HR, Finance, Marketing, Engineering"#
        );
    }

    #[test]
    fn test_refinement_does_not_mutate_original() {
        let base = ErrorKind::SyntaxError.err();
        let refined = base.clone().with_context("line 1, column 2");
        assert_eq!(base.to_string(), "syntax error");
        assert_ne!(base, refined);
    }

    #[test]
    fn test_kind_accessor() {
        let err = ErrorKind::ValueOutOfRange.err().with_value(42);
        assert_eq!(err.kind(), ErrorKind::ValueOutOfRange);
        assert_eq!(err.value(), "42");
    }
}
