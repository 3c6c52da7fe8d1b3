//! Deep merge of plugin options.
//!
//! Options are plain JSON values. Two objects merge key by key, recursively;
//! anything else in the overlay (arrays, scalars, `null`) replaces the base
//! value wholesale. Keys absent from the overlay keep their base value.

use serde_json::{Map, Value};

/// Merge `overlay` onto `base`, returning a new value.
///
/// Neither input is modified.
pub fn merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_maps(base_map, overlay_map))
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge an optional overlay; `None` behaves like an empty object.
pub fn merge_optional(base: &Value, overlay: Option<&Value>) -> Value {
    match overlay {
        Some(overlay) => merge(base, overlay),
        None => base.clone(),
    }
}

fn merge_maps(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, overlay_value) in overlay {
        let value = match base.get(key) {
            Some(base_value) => merge(base_value, overlay_value),
            None => overlay_value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}
