//! Error types shared by every flex-json operation.

use thiserror::Error;

use crate::route::Route;
use crate::value::{Value, ValueKind};

/// Result alias for flex-json operations.
pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Error)]
pub enum JsonError {
    /// A mutation was attempted on a readonly document.
    #[error("cannot edit a readonly document")]
    EditReadonly,
    /// A typed read found an absent value or a value of another kind.
    #[error(
        "unexpected value {} (type: {}) detected, expected {}",
        describe(.value),
        kind_name(.value),
        .expected
    )]
    InvalidType {
        expected: &'static str,
        value: Option<Value>,
    },
    /// The value handed to a write is not allowed by the document options.
    #[error("value of kind {kind} is not allowed in this document")]
    InvalidValue { kind: ValueKind },
    #[error("bigint is not allowed in this document")]
    BigIntNotAllowed,
    /// Enumeration was requested on something that has no children.
    #[error("value at {route} is not a container (type: {found})")]
    NotContainer { route: Route, found: &'static str },
    /// A write would pad a sequence of length `len` with too many `null`s to
    /// reach `index`.
    #[error("index {index} is too far past the end of a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// The document tree is borrowed by an active reader callback.
    #[error("document is borrowed by an active reader")]
    Busy,
    #[error("invalid json pointer: {0}")]
    PointerInvalid(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl JsonError {
    pub fn invalid_type(expected: &'static str, value: Option<&Value>) -> Self {
        JsonError::InvalidType {
            expected,
            value: value.cloned(),
        }
    }
}

fn describe(value: &Option<Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => format!("\"{s}\""),
        Some(other) => other.to_string(),
    }
}

fn kind_name(value: &Option<Value>) -> &'static str {
    value.as_ref().map_or("undefined", |v| v.kind().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_type_message() {
        let err = JsonError::invalid_type("number", Some(&Value::from("5")));
        assert_eq!(
            err.to_string(),
            "unexpected value \"5\" (type: string) detected, expected number"
        );

        let err = JsonError::invalid_type("boolean", None);
        assert_eq!(
            err.to_string(),
            "unexpected value undefined (type: undefined) detected, expected boolean"
        );
    }
}
