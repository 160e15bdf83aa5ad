//! Path handles: cursors over a shared document tree.
//!
//! Every handle holds the same shared root as the [`Document`] it was derived
//! from, so a write through any handle is visible to every other one. In fast
//! mode a handle also keeps a snapshot of the value at its route, taken the
//! first time it is observed and refreshed only by writes made through that
//! same handle. Snapshots held by other handles are never touched and may go
//! stale.

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::Document;
use crate::error::{JsonError, JsonResult};
use crate::navigator::{child_steps, has_route, push_value, read_value, write_value_in_place};
use crate::options::DocumentOptions;
use crate::reader::JsonReader;
use crate::route::{PathStep, Route};
use crate::transform::JsonTransformer;
use crate::value::{find_invalid, Value};

/// The canonical root plus the options fixed at construction.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) root: RefCell<Value>,
    pub(crate) options: DocumentOptions,
}

impl Shared {
    pub(crate) fn new(root: Value, options: DocumentOptions) -> Rc<Self> {
        Rc::new(Self {
            root: RefCell::new(root),
            options,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Cache {
    /// Reads always walk the canonical root.
    Bypass,
    /// Fast mode, nothing read yet.
    Unobserved,
    /// Fast mode snapshot; `None` records an absent value.
    Resolved(Option<Value>),
}

/// A cursor bound to a document root and an immutable [`Route`].
///
/// Handles are cheap to create: [`PathHandle::get`] only extends the route
/// and never reads the tree.
///
/// # Example
///
/// ```
/// use flex_json::{route, Document};
/// use serde_json::json;
///
/// let doc = Document::new(json!({"users": [{"name": "ada"}]})).unwrap();
/// let name = doc.get(route!["users", 0, "name"]);
/// assert_eq!(name.get_value().unwrap().as_str(), Some("ada"));
///
/// doc.get("users").add(json!({"name": "bob"})).unwrap();
/// assert!(doc.has(route!["users", 1, "name"]));
/// ```
#[derive(Debug, Clone)]
pub struct PathHandle {
    shared: Rc<Shared>,
    route: Route,
    cache: RefCell<Cache>,
}

impl PathHandle {
    pub(crate) fn new(shared: Rc<Shared>, route: Route, cache: Cache) -> Self {
        Self {
            shared,
            route,
            cache: RefCell::new(cache),
        }
    }

    fn derive(&self, route: Route) -> PathHandle {
        let cache = if self.shared.options.fast_mode {
            Cache::Unobserved
        } else {
            Cache::Bypass
        };
        PathHandle::new(Rc::clone(&self.shared), route, cache)
    }

    pub(crate) fn shared(&self) -> &Rc<Shared> {
        &self.shared
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn options(&self) -> DocumentOptions {
        self.shared.options
    }

    pub fn readonly(&self) -> bool {
        self.shared.options.readonly
    }

    pub fn fast_mode(&self) -> bool {
        self.shared.options.fast_mode
    }

    /// Returns a handle for this route extended by `route`. Lazy.
    pub fn get(&self, route: impl Into<Route>) -> PathHandle {
        self.derive(self.route.join(&route.into()))
    }

    /// Returns a new handle on the empty route of the same document.
    ///
    /// `self` keeps its route; routes are never shared between handles.
    pub fn reset_path(&self) -> PathHandle {
        self.derive(Route::root())
    }

    /// Calls `f` with the value at this route, or `None` when absent.
    ///
    /// In fast mode the first call takes the snapshot later calls are served
    /// from.
    pub fn with_value<R>(&self, f: impl FnOnce(Option<&Value>) -> R) -> R {
        if self.ensure_cached() {
            if let Cache::Resolved(cached) = &*self.cache.borrow() {
                return f(cached.as_ref());
            }
        }
        let root = self.shared.root.borrow();
        f(read_value(&root, self.route.steps()))
    }

    pub fn get_value(&self) -> Option<Value> {
        self.with_value(|value| value.cloned())
    }

    /// Existence check for this route extended by `route`. Never fails.
    pub fn has(&self, route: impl Into<Route>) -> bool {
        let route = route.into();
        self.with_value(|value| value.is_some_and(|node| has_route(node, route.steps())))
    }

    pub fn exists(&self) -> bool {
        self.with_value(|value| value.is_some())
    }

    /// Runs `f` with a borrowed reader positioned at this route.
    ///
    /// The document cannot be written while `f` runs; writes attempted from
    /// inside fail with [`JsonError::Busy`].
    pub fn reader<R>(&self, f: impl FnOnce(JsonReader<'_>) -> R) -> R {
        let options = self.shared.options.json;
        self.with_value(|value| f(JsonReader::new(value, options)))
    }

    /// Writes `value` at this route extended by `key`.
    pub fn set(&self, key: impl Into<Route>, value: impl Into<Value>) -> JsonResult<&Self> {
        let route = self.route.join(&key.into());
        self.write_at(&route, value.into())?;
        Ok(self)
    }

    /// Writes `value` at this handle's own route.
    pub fn assign(&self, value: impl Into<Value>) -> JsonResult<&Self> {
        self.write_at(&self.route, value.into())?;
        Ok(self)
    }

    /// Appends `value` to the sequence at this route.
    ///
    /// An absent location, or one holding anything but a sequence, is first
    /// replaced by an empty sequence.
    pub fn add(&self, value: impl Into<Value>) -> JsonResult<&Self> {
        let value = value.into();
        self.check_writable(&value)?;
        let changed = self.mutate(|root| push_value(root, self.route.steps(), value))?;
        if changed {
            tracing::trace!(route = %self.route, "created sequence for append");
        }
        Ok(self)
    }

    /// Replaces the value at this route with the output of `transformer`.
    ///
    /// The transformer receives the current value of the document, not a
    /// fast-mode snapshot. An absent value is handed over as `null`.
    pub fn transform_with(&self, transformer: &impl JsonTransformer) -> JsonResult<&Self> {
        self.check_editable()?;
        let current = {
            let root = self.shared.root.try_borrow().map_err(|_| JsonError::Busy)?;
            read_value(&root, self.route.steps()).cloned().unwrap_or_default()
        };
        let next = transformer.transform(current)?;
        self.write_at(&self.route, next)?;
        Ok(self)
    }

    /// Handles for every immediate child, in order.
    pub fn children(&self) -> JsonResult<Vec<PathHandle>> {
        Ok(self
            .child_keys()?
            .into_iter()
            .map(|step| self.get(step))
            .collect())
    }

    pub fn map<T>(&self, f: impl FnMut(PathHandle) -> T) -> JsonResult<Vec<T>> {
        Ok(self.children()?.into_iter().map(f).collect())
    }

    pub fn find(
        &self,
        predicate: impl FnMut(&PathHandle) -> bool,
    ) -> JsonResult<Option<PathHandle>> {
        Ok(self.children()?.into_iter().find(predicate))
    }

    pub fn filter(
        &self,
        predicate: impl FnMut(&PathHandle) -> bool,
    ) -> JsonResult<Vec<PathHandle>> {
        Ok(self.children()?.into_iter().filter(predicate).collect())
    }

    pub fn for_each(&self, f: impl FnMut(PathHandle)) -> JsonResult<()> {
        self.children()?.into_iter().for_each(f);
        Ok(())
    }

    /// Fails unless the value here is a mapping.
    pub fn expect_mapping(&self) -> JsonResult<&Self> {
        self.with_value(|value| match value {
            Some(Value::Object(_)) => Ok(()),
            other => Err(JsonError::invalid_type("object", other)),
        })?;
        Ok(self)
    }

    /// Fails unless the value here is a sequence.
    pub fn expect_sequence(&self) -> JsonResult<&Self> {
        self.with_value(|value| match value {
            Some(Value::Array(_)) => Ok(()),
            other => Err(JsonError::invalid_type("array", other)),
        })?;
        Ok(self)
    }

    /// Copies the value at this route into a new, independent document with
    /// the same options. An absent value becomes `null`.
    pub fn detach(&self) -> Document {
        Document::from_trusted(self.get_value().unwrap_or_default(), self.shared.options)
    }

    fn child_keys(&self) -> JsonResult<Vec<PathStep>> {
        self.with_value(|value| {
            value
                .and_then(child_steps)
                .ok_or_else(|| JsonError::NotContainer {
                    route: self.route.clone(),
                    found: value.map_or("undefined", |node| node.kind().as_str()),
                })
        })
    }

    pub(crate) fn check_editable(&self) -> JsonResult<()> {
        if self.shared.options.readonly {
            return Err(JsonError::EditReadonly);
        }
        Ok(())
    }

    pub(crate) fn check_writable(&self, value: &Value) -> JsonResult<()> {
        self.check_editable()?;
        match find_invalid(&self.shared.options.json, value) {
            Some(kind) => Err(JsonError::InvalidValue { kind }),
            None => Ok(()),
        }
    }

    fn write_at(&self, route: &Route, value: Value) -> JsonResult<()> {
        self.check_writable(&value)?;
        let changed = self.mutate(|root| write_value_in_place(root, route.steps(), value))?;
        if changed {
            tracing::trace!(route = %route, "created structure on write");
        }
        Ok(())
    }

    /// Applies `edit` to the canonical root, then re-resolves this handle's
    /// snapshot if it has one.
    ///
    /// Fails with [`JsonError::Busy`] before touching the tree while a
    /// reader callback holds the root or this handle's snapshot.
    fn mutate(&self, edit: impl FnOnce(&mut Value) -> JsonResult<bool>) -> JsonResult<bool> {
        let mut cache = self.cache.try_borrow_mut().map_err(|_| JsonError::Busy)?;
        let mut root = self.shared.root.try_borrow_mut().map_err(|_| JsonError::Busy)?;
        let changed = edit(&mut root)?;
        if let Cache::Resolved(_) = *cache {
            *cache = Cache::Resolved(read_value(&root, self.route.steps()).cloned());
        }
        Ok(changed)
    }

    /// Fills the snapshot on first observation. Returns whether reads should
    /// be served from the snapshot.
    fn ensure_cached(&self) -> bool {
        match self.cache.try_borrow_mut() {
            Ok(mut cache) => match *cache {
                Cache::Bypass => false,
                Cache::Resolved(_) => true,
                Cache::Unobserved => {
                    let root = self.shared.root.borrow();
                    *cache = Cache::Resolved(read_value(&root, self.route.steps()).cloned());
                    true
                }
            },
            // Held by an enclosing `with_value`, which only borrows a
            // resolved snapshot.
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::new(value).unwrap()
    }

    fn fast_doc(value: serde_json::Value) -> Document {
        Document::with_options(value, DocumentOptions::new().with_fast_mode(true)).unwrap()
    }

    #[test]
    fn test_get_is_lazy_and_extends_route() {
        let d = doc(json!({}));
        let h = d.get("a").get(route![0, "b"]);
        assert_eq!(h.route(), &route!["a", 0, "b"]);
        assert!(!h.exists());
        assert_eq!(d.data(), Value::from(json!({})));
    }

    #[test]
    fn test_writes_are_shared_between_handles() {
        let d = doc(json!({"a": {}}));
        let a = d.get("a");
        let other = d.get("a");
        a.set("x", 1).unwrap();
        assert_eq!(other.get("x").get_value(), Some(Value::from(1)));
    }

    #[test]
    fn test_assign_writes_own_route() {
        let d = doc(json!({}));
        d.get(route!["a", "b"]).assign("v").unwrap();
        assert_eq!(d.data(), Value::from(json!({"a": {"b": "v"}})));
    }

    #[test]
    fn test_add_replaces_scalar() {
        let d = doc(json!({"list": 3}));
        d.get("list").add(1).unwrap().add(2).unwrap();
        assert_eq!(d.data(), Value::from(json!({"list": [1, 2]})));
    }

    #[test]
    fn test_children_in_order() {
        let d = doc(json!({"b": 1, "a": 2}));
        let routes: Vec<Route> = d.map(|child| child.route().clone()).unwrap();
        assert_eq!(routes, vec![route!["b"], route!["a"]]);

        let found = d
            .find(|child| child.get_value() == Some(Value::from(2)))
            .unwrap()
            .unwrap();
        assert_eq!(found.route(), &route!["a"]);
    }

    #[test]
    fn test_iteration_of_scalar_fails() {
        let d = doc(json!({"n": 1}));
        let err = d.get("n").children().unwrap_err();
        assert!(matches!(err, JsonError::NotContainer { found: "number", .. }));
        let err = d.get("missing").for_each(|_| {}).unwrap_err();
        assert!(matches!(err, JsonError::NotContainer { found: "undefined", .. }));
    }

    #[test]
    fn test_reset_path_returns_new_handle() {
        let d = doc(json!({"a": {"b": 1}}));
        let h = d.get(route!["a", "b"]);
        let top = h.reset_path();
        assert!(top.route().is_empty());
        assert_eq!(h.route(), &route!["a", "b"]);
        assert!(top.has(route!["a", "b"]));
    }

    #[test]
    fn test_detach_is_independent() {
        let d = doc(json!({"a": {"b": 1}}));
        let copy = d.get("a").detach();
        copy.set("b", 2).unwrap();
        assert_eq!(d.get(route!["a", "b"]).get_value(), Some(Value::from(1)));
        assert_eq!(copy.get("b").get_value(), Some(Value::from(2)));
        assert_eq!(d.get("missing").detach().data(), Value::Null);
    }

    #[test]
    fn test_expect_container_kind() {
        let d = doc(json!({"o": {}, "a": []}));
        assert!(d.get("o").expect_mapping().is_ok());
        assert!(d.get("a").expect_sequence().is_ok());
        assert!(matches!(
            d.get("a").expect_mapping(),
            Err(JsonError::InvalidType { expected: "object", .. })
        ));
        assert!(d.get("o").expect_sequence().is_err());
    }

    #[test]
    fn test_fast_mode_snapshot_taken_on_first_read() {
        let d = fast_doc(json!({"a": 1}));
        let h = d.get("a");
        // Not observed yet, so a later write is still visible.
        d.set("a", 2).unwrap();
        assert_eq!(h.get_value(), Some(Value::from(2)));
        d.set("a", 3).unwrap();
        assert_eq!(h.get_value(), Some(Value::from(2)));
    }

    #[test]
    fn test_fast_mode_write_refreshes_own_snapshot() {
        let d = fast_doc(json!({"a": 1}));
        let h = d.get("a");
        assert_eq!(h.get_value(), Some(Value::from(1)));
        h.assign(5).unwrap();
        assert_eq!(h.get_value(), Some(Value::from(5)));
        assert!(!h.has("x"));
    }

    #[test]
    fn test_write_inside_reader_is_busy() {
        let d = doc(json!({"a": 1}));
        let result = d.reader(|_| d.set("a", 2).map(|_| ()));
        assert!(matches!(result, Err(JsonError::Busy)));
        assert_eq!(d.get("a").get_value(), Some(Value::from(1)));
    }

    #[test]
    fn test_fast_mode_write_inside_own_reader_is_busy() {
        let d = fast_doc(json!({"a": {"x": 1}}));
        let h = d.get("a");
        assert_eq!(h.get_value(), Some(Value::from(json!({"x": 1}))));

        let result = h.reader(|_| h.set("x", 2).map(|_| ()));
        assert!(matches!(result, Err(JsonError::Busy)));
        assert!(matches!(h.reader(|_| h.add(3).map(|_| ())), Err(JsonError::Busy)));
        assert_eq!(d.data(), Value::from(json!({"a": {"x": 1}})));

        h.set("x", 2).unwrap();
        assert_eq!(h.get_value(), Some(Value::from(json!({"x": 2}))));
    }

    #[test]
    fn test_transform_with_reads_canonical_value() {
        let d = fast_doc(json!({"n": 1}));
        let h = d.get("n");
        assert_eq!(h.get_value(), Some(Value::from(1)));
        d.set("n", 5).unwrap();

        let double = |value: Value| -> JsonResult<Value> {
            Ok(Value::from(value.as_f64().unwrap_or_default() * 2.0))
        };
        h.transform_with(&double).unwrap();
        assert_eq!(d.get("n").get_value().and_then(|v| v.as_f64()), Some(10.0));
        assert_eq!(h.get_value().and_then(|v| v.as_f64()), Some(10.0));
    }

    #[test]
    fn test_out_of_range_index_leaves_document_intact() {
        let d = doc(json!({"list": [1]}));
        let route = Route::from_pointer("/list/18446744073709551615").unwrap();
        assert!(matches!(d.set(route, 1), Err(JsonError::IndexOutOfRange { .. })));
        assert!(matches!(
            d.get(route![usize::MAX / 2]).add(1),
            Err(JsonError::IndexOutOfRange { .. })
        ));
        assert_eq!(d.data(), Value::from(json!({"list": [1]})));
    }

    #[test]
    fn test_transform_with_closure() {
        let d = doc(json!({"n": 2}));
        let double = |value: Value| -> JsonResult<Value> {
            let n = value.as_f64().unwrap_or_default();
            Ok(Value::from(n * 2.0))
        };
        d.get("n").transform_with(&double).unwrap();
        assert_eq!(d.get("n").get_value().and_then(|v| v.as_f64()), Some(4.0));
    }
}
