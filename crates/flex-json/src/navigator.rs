//! Stateless walks over a value tree.
//!
//! Reads never fail: an absent entry, a key of the wrong kind for the
//! container it meets, or a scalar in the middle of a route all collapse to
//! "not found". Writes auto-vivify: missing containers are created (a sequence
//! for an index step, a mapping for a key step) and a node whose kind does not
//! match the step is replaced, discarding what it held.

use crate::error::{JsonError, JsonResult};
use crate::route::PathStep;
use crate::value::{Mapping, Value};

/// Most `null` slots a single write may add to pad a sequence up to the
/// requested index.
pub const MAX_PADDING: usize = 1 << 20;

/// Outcome of [`resolve_container`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Container(&'a Value),
    /// A scalar or null was met where a container was needed.
    NotObject,
    /// An entry was absent, or the step kind did not match the container.
    NotFound,
}

/// Result of [`write_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct Written {
    pub root: Value,
    /// Whether a container was created, replaced or extended on the way.
    pub changed: bool,
}

/// Walks `root` through every step of `route` and returns the container found
/// at the end.
pub fn resolve_container<'a>(root: &'a Value, route: &[PathStep]) -> Resolved<'a> {
    let mut current = root;
    for step in route {
        current = match (step, current) {
            (PathStep::Index(index), Value::Array(items)) => match items.get(*index) {
                Some(item) => item,
                None => return Resolved::NotFound,
            },
            (PathStep::Key(key), Value::Object(map)) => match map.get(key) {
                Some(item) => item,
                None => return Resolved::NotFound,
            },
            (_, Value::Array(_) | Value::Object(_)) => return Resolved::NotFound,
            _ => return Resolved::NotObject,
        };
    }
    if current.is_container() {
        Resolved::Container(current)
    } else {
        Resolved::NotObject
    }
}

/// Indexes a single step into a container.
pub fn child<'a>(container: &'a Value, step: &PathStep) -> Option<&'a Value> {
    match (step, container) {
        (PathStep::Index(index), Value::Array(items)) => items.get(*index),
        (PathStep::Key(key), Value::Object(map)) => map.get(key),
        _ => None,
    }
}

/// Reads the value at `route`; the empty route yields `root` itself.
pub fn read_value<'a>(root: &'a Value, route: &[PathStep]) -> Option<&'a Value> {
    let Some((last, parent)) = route.split_last() else {
        return Some(root);
    };
    match resolve_container(root, parent) {
        Resolved::Container(container) => child(container, last),
        Resolved::NotObject | Resolved::NotFound => None,
    }
}

pub fn read_value_mut<'a>(root: &'a mut Value, route: &[PathStep]) -> Option<&'a mut Value> {
    let mut current = root;
    for step in route {
        current = match (step, current) {
            (PathStep::Index(index), Value::Array(items)) => items.get_mut(*index)?,
            (PathStep::Key(key), Value::Object(map)) => map.get_mut(key)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Existence check; never fails.
pub fn has_route(node: &Value, route: &[PathStep]) -> bool {
    read_value(node, route).is_some()
}

/// The steps addressing every immediate child of `node`, in order: indices
/// for a sequence, keys in insertion order for a mapping. `None` for scalars.
pub fn child_steps(node: &Value) -> Option<Vec<PathStep>> {
    match node {
        Value::Array(items) => Some((0..items.len()).map(PathStep::Index).collect()),
        Value::Object(map) => Some(map.keys().cloned().map(PathStep::Key).collect()),
        _ => None,
    }
}

/// Stores `value` at `route`, creating or replacing containers on the way.
///
/// Compatible containers are kept as they are. A node whose kind conflicts
/// with the next step (a mapping met by an index, a sequence met by a key, or
/// any scalar) is replaced by a fresh container of the required kind. Indices
/// past the end of a sequence pad it with `null`, at most [`MAX_PADDING`]
/// slots per sequence; a route needing more fails with
/// [`JsonError::IndexOutOfRange`] before anything is written. The empty route
/// replaces the root.
///
/// # Example
///
/// ```
/// use flex_json::navigator::write_value;
/// use flex_json::{route, Value};
///
/// let written = write_value(Value::Null, route!["a", 0, "b"].steps(), Value::from(1)).unwrap();
/// assert!(written.changed);
/// assert_eq!(written.root.to_string(), r#"{"a":[{"b":1}]}"#);
/// ```
pub fn write_value(root: Value, route: &[PathStep], value: Value) -> JsonResult<Written> {
    check_padding(&root, route)?;
    let mut changed = route.is_empty();
    let root = vivify(root, route, value, &mut changed);
    Ok(Written { root, changed })
}

/// In-place form of [`write_value`]; returns whether structure changed.
/// On error `root` is left untouched.
pub fn write_value_in_place(root: &mut Value, route: &[PathStep], value: Value) -> JsonResult<bool> {
    check_padding(root, route)?;
    let mut changed = route.is_empty();
    *root = vivify(std::mem::take(root), route, value, &mut changed);
    Ok(changed)
}

/// Walks the existing tree along `route` and rejects index steps that would
/// pad a sequence by more than [`MAX_PADDING`] slots. Nodes that will be
/// replaced or created count as empty sequences.
fn check_padding(root: &Value, route: &[PathStep]) -> JsonResult<()> {
    let mut current = Some(root);
    for step in route {
        if let PathStep::Index(index) = step {
            let len = current.and_then(Value::as_array).map_or(0, Vec::len);
            if index.saturating_sub(len) > MAX_PADDING {
                return Err(JsonError::IndexOutOfRange { index: *index, len });
            }
        }
        current = current.and_then(|node| child(node, step));
    }
    Ok(())
}

fn vivify(node: Value, route: &[PathStep], value: Value, changed: &mut bool) -> Value {
    let Some((step, rest)) = route.split_first() else {
        return value;
    };
    match step {
        PathStep::Index(index) => {
            let mut items = match node {
                Value::Array(items) => items,
                _ => {
                    *changed = true;
                    Vec::new()
                }
            };
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
                *changed = true;
            }
            let slot = std::mem::take(&mut items[*index]);
            items[*index] = vivify(slot, rest, value, changed);
            Value::Array(items)
        }
        PathStep::Key(key) => {
            let mut map = match node {
                Value::Object(map) => map,
                _ => {
                    *changed = true;
                    Mapping::new()
                }
            };
            let slot = match map.get_mut(key) {
                Some(slot) => std::mem::take(slot),
                None => {
                    *changed = true;
                    Value::Null
                }
            };
            // Re-inserting an existing key keeps its position.
            map.insert(key.clone(), vivify(slot, rest, value, changed));
            Value::Object(map)
        }
    }
}

/// Makes sure the node at `route` is a sequence, replacing whatever is there
/// (and creating the route) when it is not.
pub fn ensure_sequence(root: &mut Value, route: &[PathStep]) -> JsonResult<bool> {
    if matches!(read_value(root, route), Some(Value::Array(_))) {
        return Ok(false);
    }
    write_value_in_place(root, route, Value::Array(Vec::new()))?;
    Ok(true)
}

/// Appends `value` to the sequence at `route`, first turning the location
/// into an empty sequence if it holds anything else.
pub fn push_value(root: &mut Value, route: &[PathStep], value: Value) -> JsonResult<bool> {
    let changed = ensure_sequence(root, route)?;
    if let Some(Value::Array(items)) = read_value_mut(root, route) {
        items.push(value);
    }
    Ok(changed)
}
