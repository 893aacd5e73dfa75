//! Helpers for reshaping delegated response data (`serde_json` values).
//!
//! GraphQL applies a field's selection set to every item of a list value, so
//! every helper here maps over lists transparently.

use serde_json::Map;
use serde_json::Value as JsonValue;

/// Applies `f` to every object reachable from `value` through (possibly
/// nested) lists. `null` and scalars are returned unchanged.
pub(crate) fn map_objects<F>(value: JsonValue, f: &mut F) -> JsonValue
where
    F: FnMut(Map<String, JsonValue>) -> JsonValue,
{
    match value {
        JsonValue::Object(object) => f(object),
        JsonValue::Array(items) => JsonValue::Array(
            items.into_iter().map(|item| map_objects(item, f)).collect(),
        ),
        other => other,
    }
}

/// Applies `f` to every non-null item reachable from `value` through
/// (possibly nested) lists. `null` is returned unchanged.
pub(crate) fn map_non_null<F>(value: JsonValue, f: &mut F) -> JsonValue
where
    F: FnMut(JsonValue) -> JsonValue,
{
    match value {
        JsonValue::Null => JsonValue::Null,
        JsonValue::Array(items) => JsonValue::Array(
            items.into_iter().map(|item| map_non_null(item, f)).collect(),
        ),
        other => f(other),
    }
}

/// Reads the value at `path`. Missing keys and `null`s along the way read as
/// `null`; lists along the way yield a list of the values read from each
/// item.
pub(crate) fn value_at_path(value: &JsonValue, path: &[String]) -> JsonValue {
    let Some((key, rest)) = path.split_first() else {
        return value.clone();
    };
    match value {
        JsonValue::Object(object) => match object.get(key) {
            Some(child) => value_at_path(child, rest),
            None => JsonValue::Null,
        },
        JsonValue::Array(items) => JsonValue::Array(
            items.iter().map(|item| value_at_path(item, path)).collect(),
        ),
        _ => JsonValue::Null,
    }
}

pub(crate) fn value_in_object(
    object: &Map<String, JsonValue>,
    path: &[String],
) -> JsonValue {
    let Some((key, rest)) = path.split_first() else {
        return JsonValue::Object(object.clone());
    };
    object.get(key)
        .map(|child| value_at_path(child, rest))
        .unwrap_or(JsonValue::Null)
}

/// Nests `value` under `path` (`wrap_in_path(v, ["a", "b"])` is
/// `{"a": {"b": v}}`).
pub(crate) fn wrap_in_path(value: JsonValue, path: &[String]) -> JsonValue {
    path.iter().rev().fold(value, |inner, key| {
        let mut object = Map::new();
        object.insert(key.clone(), inner);
        JsonValue::Object(object)
    })
}

/// Inserts `value` at `key` in `target`, deep-merging with whatever object
/// already lives there. A non-object `target` is replaced by a fresh object.
pub(crate) fn merge_at_key(target: &mut JsonValue, key: &str, value: JsonValue) {
    if !target.is_object() {
        *target = JsonValue::Object(Map::new());
    }
    let JsonValue::Object(object) = target else {
        return;
    };
    match value {
        JsonValue::Object(incoming) => {
            if let Some(existing @ JsonValue::Object(_)) = object.get_mut(key) {
                for (child_key, child_value) in incoming {
                    merge_at_key(existing, &child_key, child_value);
                }
            } else {
                object.insert(key.to_string(), JsonValue::Object(incoming));
            }
        },
        other => {
            object.insert(key.to_string(), other);
        },
    }
}
