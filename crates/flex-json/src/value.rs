//! The JSON-shaped value tree.
//!
//! [`Value`] is a closed sum over the JSON kinds plus an optional
//! arbitrary-precision integer. Sequences (`Array`) and mappings (`Object`)
//! are distinct container kinds, even when empty. Mappings keep insertion
//! order so a loaded document serialises back in the same key order.

use std::fmt;

use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

use crate::options::JsonOptions;

/// String-keyed mapping, insertion ordered.
pub type Mapping = IndexMap<String, Value>;

/// Ordered sequence of values.
pub type Sequence = Vec<Value>;

/// A node of the value tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    /// Only valid in documents whose [`JsonOptions::allow_bigint`] is set.
    BigInt(BigInt),
    String(String),
    Array(Sequence),
    Object(Mapping),
}

/// Runtime kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    BigInt,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::BigInt => "bigint",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }

    /// Returns `true` for the kinds that can hold addressable children.
    pub fn is_container(self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Sequence> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Mapping> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

/// Returns the kind of the first node that is not a valid value under
/// `options`, or `None` when the whole tree is valid.
pub fn find_invalid(options: &JsonOptions, value: &Value) -> Option<ValueKind> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
        Value::BigInt(_) if options.allow_bigint => None,
        Value::BigInt(_) => Some(ValueKind::BigInt),
        Value::Array(items) => items.iter().find_map(|item| find_invalid(options, item)),
        Value::Object(map) => map.values().find_map(|item| find_invalid(options, item)),
    }
}

/// Recursively checks that `value` conforms to the value model allowed by
/// `options`.
///
/// # Example
///
/// ```
/// use flex_json::{is_value, BigInt, JsonOptions, Value};
///
/// let tree = Value::Array(vec![Value::from(1), Value::BigInt(BigInt::from(7))]);
/// assert!(!is_value(&JsonOptions::default(), &tree));
/// assert!(is_value(&JsonOptions { allow_bigint: true }, &tree));
/// ```
pub fn is_value(options: &JsonOptions, value: &Value) -> bool {
    find_invalid(options, value).is_none()
}

/// A mapping whose every entry is a valid value.
pub fn is_mapping(options: &JsonOptions, value: &Value) -> bool {
    match value {
        Value::Object(map) => map.values().all(|item| is_value(options, item)),
        _ => false,
    }
}

/// A sequence whose every element is a valid value.
pub fn is_sequence(options: &JsonOptions, value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(|item| is_value(options, item)),
        _ => false,
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::BigInt(n) => {
                if let Ok(small) = i64::try_from(&n) {
                    serde_json::Value::from(small)
                } else if let Ok(small) = u64::try_from(&n) {
                    serde_json::Value::from(small)
                } else {
                    serde_json::Value::String(n.to_string())
                }
            }
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, item)| (key, serde_json::Value::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n.into())
    }
}

/// Non-finite floats have no JSON representation and become `Null`.
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Sequence> for Value {
    fn from(items: Sequence) -> Self {
        Value::Array(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            // JSON text has no bigint; wide values fall back to decimal strings.
            Value::BigInt(n) => match i128::try_from(n) {
                Ok(small) => serializer.serialize_i128(small),
                Err(_) => serializer.collect_str(n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    out.serialize_entry(key, item)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

/// Compact JSON rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
