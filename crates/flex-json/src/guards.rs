//! Type-narrowing reads.
//!
//! Every guard reads the value at the implementor's position and checks its
//! kind exactly; nothing is coerced. Four variants exist per kind:
//!
//! | variant | absent | `null` | other kind |
//! |---|---|---|---|
//! | `get_as_K` | error | error | error |
//! | `get_as_K_with_default` | default | error | error |
//! | `get_as_nullable_K` | error | `None` | error |
//! | `get_as_nullable_K_with_default` | default | `None` | error |
//!
//! Errors are [`JsonError::InvalidType`] and carry the offending value.
//! The bigint and number-or-bigint guards also require a document that
//! accepts bigints.

use num_bigint::BigInt;

use crate::document::Document;
use crate::error::{JsonError, JsonResult};
use crate::handle::PathHandle;
use crate::options::JsonOptions;
use crate::value::{is_mapping, is_sequence, Mapping, Sequence, Value};

/// A value accepted by the `get_as_number_or_bigint*` guards.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberOrBigInt {
    Number(f64),
    BigInt(BigInt),
}

impl From<NumberOrBigInt> for Value {
    fn from(value: NumberOrBigInt) -> Self {
        match value {
            NumberOrBigInt::Number(n) => Value::from(n),
            NumberOrBigInt::BigInt(n) => Value::BigInt(n),
        }
    }
}

/// Read access to a single, possibly absent, value.
///
/// # Example
///
/// ```
/// use flex_json::{Document, JsonError, TypedRead};
/// use serde_json::json;
///
/// let doc = Document::new(json!({"port": 8080, "name": "5"})).unwrap();
/// assert_eq!(doc.get("port").get_as_number().unwrap(), 8080.0);
/// assert_eq!(doc.get("missing").get_as_number_with_default(0.0).unwrap(), 0.0);
/// assert!(matches!(
///     doc.get("name").get_as_number_with_default(0.0),
///     Err(JsonError::InvalidType { .. })
/// ));
/// ```
pub trait TypedRead {
    fn with_value<R>(&self, f: impl FnOnce(Option<&Value>) -> R) -> R;

    fn json_options(&self) -> JsonOptions;

    fn get_as_number(&self) -> JsonResult<f64> {
        narrow(self, "number", Value::as_f64)
    }

    fn get_as_number_with_default(&self, default: f64) -> JsonResult<f64> {
        narrow_or(self, "number", default, Value::as_f64)
    }

    fn get_as_nullable_number(&self) -> JsonResult<Option<f64>> {
        narrow_nullable(self, "number", Value::as_f64)
    }

    fn get_as_nullable_number_with_default(&self, default: Option<f64>) -> JsonResult<Option<f64>> {
        narrow_nullable_or(self, "number", default, Value::as_f64)
    }

    fn get_as_string(&self) -> JsonResult<String> {
        narrow(self, "string", owned_str)
    }

    fn get_as_string_with_default(&self, default: impl Into<String>) -> JsonResult<String> {
        narrow_or(self, "string", default.into(), owned_str)
    }

    fn get_as_nullable_string(&self) -> JsonResult<Option<String>> {
        narrow_nullable(self, "string", owned_str)
    }

    fn get_as_nullable_string_with_default(
        &self,
        default: Option<String>,
    ) -> JsonResult<Option<String>> {
        narrow_nullable_or(self, "string", default, owned_str)
    }

    fn get_as_boolean(&self) -> JsonResult<bool> {
        narrow(self, "boolean", Value::as_bool)
    }

    fn get_as_boolean_with_default(&self, default: bool) -> JsonResult<bool> {
        narrow_or(self, "boolean", default, Value::as_bool)
    }

    fn get_as_nullable_boolean(&self) -> JsonResult<Option<bool>> {
        narrow_nullable(self, "boolean", Value::as_bool)
    }

    fn get_as_nullable_boolean_with_default(
        &self,
        default: Option<bool>,
    ) -> JsonResult<Option<bool>> {
        narrow_nullable_or(self, "boolean", default, Value::as_bool)
    }

    /// Fails with [`JsonError::BigIntNotAllowed`] when the document does not
    /// accept bigints, whatever the stored value.
    fn get_as_bigint(&self) -> JsonResult<BigInt> {
        require_bigint(self)?;
        narrow(self, "bigint", owned_bigint)
    }

    fn get_as_bigint_with_default(&self, default: BigInt) -> JsonResult<BigInt> {
        require_bigint(self)?;
        narrow_or(self, "bigint", default, owned_bigint)
    }

    fn get_as_nullable_bigint(&self) -> JsonResult<Option<BigInt>> {
        require_bigint(self)?;
        narrow_nullable(self, "bigint", owned_bigint)
    }

    fn get_as_nullable_bigint_with_default(
        &self,
        default: Option<BigInt>,
    ) -> JsonResult<Option<BigInt>> {
        require_bigint(self)?;
        narrow_nullable_or(self, "bigint", default, owned_bigint)
    }

    /// Accepts a number or a bigint. Like the bigint guards, fails with
    /// [`JsonError::BigIntNotAllowed`] when the document does not accept
    /// bigints.
    fn get_as_number_or_bigint(&self) -> JsonResult<NumberOrBigInt> {
        require_bigint(self)?;
        narrow(self, "number or bigint", owned_numeric)
    }

    fn get_as_number_or_bigint_with_default(
        &self,
        default: NumberOrBigInt,
    ) -> JsonResult<NumberOrBigInt> {
        require_bigint(self)?;
        narrow_or(self, "number or bigint", default, owned_numeric)
    }

    fn get_as_nullable_number_or_bigint(&self) -> JsonResult<Option<NumberOrBigInt>> {
        require_bigint(self)?;
        narrow_nullable(self, "number or bigint", owned_numeric)
    }

    fn get_as_nullable_number_or_bigint_with_default(
        &self,
        default: Option<NumberOrBigInt>,
    ) -> JsonResult<Option<NumberOrBigInt>> {
        require_bigint(self)?;
        narrow_nullable_or(self, "number or bigint", default, owned_numeric)
    }

    /// A mapping whose entries are all valid values.
    fn get_as_mapping(&self) -> JsonResult<Mapping> {
        let options = self.json_options();
        narrow(self, "object", |v| owned_mapping(&options, v))
    }

    fn get_as_mapping_with_default(&self, default: Mapping) -> JsonResult<Mapping> {
        let options = self.json_options();
        narrow_or(self, "object", default, |v| owned_mapping(&options, v))
    }

    fn get_as_nullable_mapping(&self) -> JsonResult<Option<Mapping>> {
        let options = self.json_options();
        narrow_nullable(self, "object", |v| owned_mapping(&options, v))
    }

    fn get_as_nullable_mapping_with_default(
        &self,
        default: Option<Mapping>,
    ) -> JsonResult<Option<Mapping>> {
        let options = self.json_options();
        narrow_nullable_or(self, "object", default, |v| owned_mapping(&options, v))
    }

    /// A sequence whose elements are all valid values.
    fn get_as_sequence(&self) -> JsonResult<Sequence> {
        let options = self.json_options();
        narrow(self, "array", |v| owned_sequence(&options, v))
    }

    fn get_as_sequence_with_default(&self, default: Sequence) -> JsonResult<Sequence> {
        let options = self.json_options();
        narrow_or(self, "array", default, |v| owned_sequence(&options, v))
    }

    fn get_as_nullable_sequence(&self) -> JsonResult<Option<Sequence>> {
        let options = self.json_options();
        narrow_nullable(self, "array", |v| owned_sequence(&options, v))
    }

    fn get_as_nullable_sequence_with_default(
        &self,
        default: Option<Sequence>,
    ) -> JsonResult<Option<Sequence>> {
        let options = self.json_options();
        narrow_nullable_or(self, "array", default, |v| owned_sequence(&options, v))
    }
}

impl TypedRead for PathHandle {
    fn with_value<R>(&self, f: impl FnOnce(Option<&Value>) -> R) -> R {
        PathHandle::with_value(self, f)
    }

    fn json_options(&self) -> JsonOptions {
        self.options().json
    }
}

impl TypedRead for Document {
    fn with_value<R>(&self, f: impl FnOnce(Option<&Value>) -> R) -> R {
        PathHandle::with_value(self, f)
    }

    fn json_options(&self) -> JsonOptions {
        self.options().json
    }
}

fn narrow<A, T>(
    reader: &A,
    expected: &'static str,
    pick: impl FnOnce(&Value) -> Option<T>,
) -> JsonResult<T>
where
    A: TypedRead + ?Sized,
{
    reader.with_value(|value| {
        value
            .and_then(pick)
            .ok_or_else(|| JsonError::invalid_type(expected, value))
    })
}

fn narrow_or<A, T>(
    reader: &A,
    expected: &'static str,
    default: T,
    pick: impl FnOnce(&Value) -> Option<T>,
) -> JsonResult<T>
where
    A: TypedRead + ?Sized,
{
    reader.with_value(|value| match value {
        None => Ok(default),
        Some(found) => pick(found).ok_or_else(|| JsonError::invalid_type(expected, value)),
    })
}

fn narrow_nullable<A, T>(
    reader: &A,
    expected: &'static str,
    pick: impl FnOnce(&Value) -> Option<T>,
) -> JsonResult<Option<T>>
where
    A: TypedRead + ?Sized,
{
    reader.with_value(|value| match value {
        Some(Value::Null) => Ok(None),
        Some(found) => match pick(found) {
            Some(narrowed) => Ok(Some(narrowed)),
            None => Err(JsonError::invalid_type(expected, value)),
        },
        None => Err(JsonError::invalid_type(expected, None)),
    })
}

fn narrow_nullable_or<A, T>(
    reader: &A,
    expected: &'static str,
    default: Option<T>,
    pick: impl FnOnce(&Value) -> Option<T>,
) -> JsonResult<Option<T>>
where
    A: TypedRead + ?Sized,
{
    reader.with_value(|value| match value {
        None => Ok(default),
        Some(Value::Null) => Ok(None),
        Some(found) => match pick(found) {
            Some(narrowed) => Ok(Some(narrowed)),
            None => Err(JsonError::invalid_type(expected, value)),
        },
    })
}

fn require_bigint<A: TypedRead + ?Sized>(reader: &A) -> JsonResult<()> {
    if reader.json_options().allow_bigint {
        Ok(())
    } else {
        Err(JsonError::BigIntNotAllowed)
    }
}

fn owned_str(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn owned_bigint(value: &Value) -> Option<BigInt> {
    value.as_bigint().cloned()
}

fn owned_numeric(value: &Value) -> Option<NumberOrBigInt> {
    match value {
        Value::Number(n) => n.as_f64().map(NumberOrBigInt::Number),
        Value::BigInt(n) => Some(NumberOrBigInt::BigInt(n.clone())),
        _ => None,
    }
}

fn owned_mapping(options: &JsonOptions, value: &Value) -> Option<Mapping> {
    match value {
        Value::Object(map) if is_mapping(options, value) => Some(map.clone()),
        _ => None,
    }
}

fn owned_sequence(options: &JsonOptions, value: &Value) -> Option<Sequence> {
    match value {
        Value::Array(items) if is_sequence(options, value) => Some(items.clone()),
        _ => None,
    }
}
