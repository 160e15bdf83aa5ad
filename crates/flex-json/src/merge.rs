//! Mapping helpers: recursive option merging and key renaming.

use std::collections::HashMap;

use crate::value::{Mapping, Value};

/// Merges `options` over `defaults` and returns the result.
///
/// For a key present on both sides the merge recurses when both values are
/// mappings; otherwise the value from `options` wins. Keys present on one
/// side only are copied as they are. Neither input is modified.
///
/// # Example
///
/// ```
/// use flex_json::merge::bind_options;
/// use flex_json::Value;
/// use serde_json::json;
///
/// let defaults = Value::from(json!({"db": {"host": "localhost", "port": 5432}, "debug": false}));
/// let options = Value::from(json!({"db": {"port": 6543}, "name": "app"}));
/// let merged = bind_options(defaults.as_object().unwrap(), options.as_object().unwrap());
/// assert_eq!(
///     Value::from(merged).to_string(),
///     r#"{"db":{"host":"localhost","port":6543},"debug":false,"name":"app"}"#
/// );
/// ```
pub fn bind_options(defaults: &Mapping, options: &Mapping) -> Mapping {
    let mut result = defaults.clone();
    for (key, value) in options {
        if let (Some(Value::Object(base)), Value::Object(overlay)) = (result.get(key), value) {
            let merged = bind_options(base, overlay);
            result.insert(key.clone(), Value::Object(merged));
            continue;
        }
        result.insert(key.clone(), value.clone());
    }
    result
}

/// [`bind_options`] lifted to values: two mappings merge, anything else
/// resolves to `overlay`.
pub fn merge_values(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => Value::Object(bind_options(base, overlay)),
        _ => overlay.clone(),
    }
}

/// Returns a copy of `map` with keys renamed through `renames`, keeping the
/// original order. Keys without an entry in `renames` are kept.
///
/// When a rename lands on a key that already exists, the later entry wins
/// and the slot of the earlier one is kept.
pub fn rename_keys(map: &Mapping, renames: &HashMap<String, String>) -> Mapping {
    let mut result = Mapping::with_capacity(map.len());
    for (key, value) in map {
        let key = renames.get(key).unwrap_or(key);
        result.insert(key.clone(), value.clone());
    }
    result
}
