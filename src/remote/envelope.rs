//! Response-envelope unwrapping.
//!
//! The backend has gone through several wrapper conventions and old rows of
//! each still exist behind proxies and caches. Rather than version-sniff,
//! every known shape is probed in a fixed order and the first hit wins.

use serde_json::Value;

/// Paths probed for a list payload, most common first. The empty path means
/// the response body itself is the array.
const LIST_PATHS: &[&[&str]] = &[
    &[],
    &["items"],
    &["data"],
    &["data", "items"],
    &["data", "data"],
    &["data", "data", "items"],
    &["data", "planner"],
    &["data", "rows"],
];

/// Paths probed for a single mutated row. The trailing empty path accepts a
/// bare object body.
const ITEM_PATHS: &[&[&str]] = &[
    &["updated"],
    &["data", "updated"],
    &["data", "item"],
    &["item"],
    &["data"],
    &[],
];

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(key))
}

/// First array found at a known list path.
pub fn extract_items(value: &Value) -> Option<&Vec<Value>> {
    LIST_PATHS
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(Value::as_array)
}

/// First object found at a known single-item path.
pub fn extract_item(value: &Value) -> Option<&Value> {
    ITEM_PATHS
        .iter()
        .filter_map(|path| lookup(value, path))
        .find(|candidate| candidate.is_object())
}

/// Human-readable failure message carried in an error body, if any.
pub fn error_message(value: &Value) -> Option<String> {
    [&["message"][..], &["data", "message"][..], &["error"][..]]
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(Value::as_str)
        .map(str::to_string)
}
