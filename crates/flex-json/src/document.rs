//! The root accessor owning a value tree.

use std::ops::Deref;

use crate::error::{JsonError, JsonResult};
use crate::handle::{Cache, PathHandle, Shared};
use crate::options::DocumentOptions;
use crate::route::Route;
use crate::value::{find_invalid, Value};

/// Owner of a value tree and the entry point for [`PathHandle`]s.
///
/// A document derefs to the handle on its empty route, so every handle
/// operation is available on it directly. That handle always reads the
/// canonical root, even in fast mode; use [`Document::root`] for a
/// caching handle on the root.
///
/// # Example
///
/// ```
/// use flex_json::{route, Document, DocumentOptions, JsonError};
/// use serde_json::json;
///
/// let doc = Document::new(json!({})).unwrap();
/// doc.set(route!["a", 0, "b"], 1).unwrap();
/// assert_eq!(doc.data().to_string(), r#"{"a":[{"b":1}]}"#);
///
/// let frozen = Document::with_options(json!({"a": 1}), DocumentOptions::new().with_readonly(true)).unwrap();
/// assert!(matches!(frozen.set("a", 2), Err(JsonError::EditReadonly)));
/// ```
#[derive(Debug)]
pub struct Document {
    handle: PathHandle,
}

impl Document {
    /// Creates a document with default options.
    pub fn new(data: impl Into<Value>) -> JsonResult<Self> {
        Self::with_options(data, DocumentOptions::default())
    }

    /// Creates a document, rejecting `data` if it holds values the options
    /// do not allow.
    pub fn with_options(data: impl Into<Value>, options: DocumentOptions) -> JsonResult<Self> {
        let data = data.into();
        if let Some(kind) = find_invalid(&options.json, &data) {
            return Err(JsonError::InvalidValue { kind });
        }
        Ok(Self::from_trusted(data, options))
    }

    pub(crate) fn from_trusted(data: Value, options: DocumentOptions) -> Self {
        let shared = Shared::new(data, options);
        Self {
            handle: PathHandle::new(shared, Route::root(), Cache::Bypass),
        }
    }

    /// A handle on the empty route that follows the fast-mode cache rules
    /// like any other derived handle.
    pub fn root(&self) -> PathHandle {
        self.handle.get(Route::root())
    }

    /// Deep copy of the whole tree.
    pub fn data(&self) -> Value {
        self.handle.shared().root.borrow().clone()
    }

    /// Replaces the whole tree.
    pub fn set_data(&self, data: impl Into<Value>) -> JsonResult<&Self> {
        self.handle.assign(data)?;
        Ok(self)
    }

    /// Replaces the whole tree regardless of the readonly flag.
    ///
    /// Meant for persistence layers that load a readonly document from
    /// storage. The value is still validated against the document options.
    pub fn install(&self, data: Value) -> JsonResult<()> {
        if let Some(kind) = find_invalid(&self.handle.options().json, &data) {
            return Err(JsonError::InvalidValue { kind });
        }
        let mut root = self
            .handle
            .shared()
            .root
            .try_borrow_mut()
            .map_err(|_| JsonError::Busy)?;
        *root = data;
        Ok(())
    }
}

impl Deref for Document {
    type Target = PathHandle;

    fn deref(&self) -> &PathHandle {
        &self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{route, BigInt};
    use serde_json::json;

    fn readonly(value: serde_json::Value) -> Document {
        Document::with_options(value, DocumentOptions::new().with_readonly(true)).unwrap()
    }

    #[test]
    fn test_readonly_rejects_every_mutation() {
        let d = readonly(json!({"a": [1]}));
        let before = d.data().to_string();

        assert!(matches!(d.set("b", 1), Err(JsonError::EditReadonly)));
        assert!(matches!(d.get("a").add(2), Err(JsonError::EditReadonly)));
        assert!(matches!(d.get(route!["x", 0]).assign(1), Err(JsonError::EditReadonly)));
        assert!(matches!(d.set_data(json!({})), Err(JsonError::EditReadonly)));
        assert!(matches!(
            d.transform_with(&|v: Value| -> JsonResult<Value> { Ok(v) }),
            Err(JsonError::EditReadonly)
        ));

        assert_eq!(d.data().to_string(), before);
    }

    #[test]
    fn test_install_bypasses_readonly() {
        let d = readonly(json!({"a": 1}));
        d.install(Value::from(json!({"b": 2}))).unwrap();
        assert_eq!(d.data(), Value::from(json!({"b": 2})));
    }

    #[test]
    fn test_bigint_rejected_unless_allowed() {
        let big = Value::BigInt(BigInt::from(1u8) << 80);

        let d = Document::new(json!({})).unwrap();
        assert!(matches!(d.set("n", big.clone()), Err(JsonError::InvalidValue { .. })));
        assert!(Document::new(big.clone()).is_err());

        let d = Document::with_options(json!({}), DocumentOptions::new().with_bigint(true)).unwrap();
        d.set("n", big.clone()).unwrap();
        assert_eq!(d.get("n").get_value(), Some(big));
    }

    #[test]
    fn test_root_handle_caches_in_fast_mode() {
        let d = Document::with_options(json!({"a": 1}), DocumentOptions::new().with_fast_mode(true))
            .unwrap();
        let root = d.root();
        assert_eq!(root.get_value(), Some(Value::from(json!({"a": 1}))));
        d.set("a", 2).unwrap();
        assert_eq!(d.get_value(), Some(Value::from(json!({"a": 2}))));
        assert_eq!(root.get_value(), Some(Value::from(json!({"a": 1}))));
    }

    #[test]
    fn test_set_data_replaces_root() {
        let d = Document::new(json!({"a": 1})).unwrap();
        d.set_data(json!([true])).unwrap();
        assert_eq!(d.data(), Value::from(json!([true])));
    }
}
