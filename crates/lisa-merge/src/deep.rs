//! Recursive object merges and deep-equality array dedup

use std::collections::HashSet;

use serde_json::Value;

use crate::Object;

/// Merge `overlay` into `base`, overlay winning on conflicts.
///
/// Objects present on both sides merge recursively. Any other value, arrays
/// included, is replaced wholesale by the overlay. Keys keep their position in
/// `base`; keys only in `overlay` are appended in overlay order.
pub fn deep_merge(base: &Object, overlay: &Object) -> Object {
    let mut result = base.clone();
    for (key, value) in overlay {
        match (result.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                *existing = deep_merge(existing, incoming);
            }
            _ => {
                result.insert(key.clone(), value.clone());
            }
        }
    }
    result
}

/// Fill keys missing from `target` with values from `defaults`.
///
/// `target` wins on every conflict; nested objects present on both sides are
/// filled recursively. `target` key order is kept and filled keys are appended.
pub fn fill_defaults(target: &Object, defaults: &Object) -> Object {
    let mut result = target.clone();
    for (key, value) in defaults {
        match (result.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(fallback)) => {
                *existing = fill_defaults(existing, fallback);
            }
            (Some(_), _) => {}
            (None, _) => {
                result.insert(key.clone(), value.clone());
            }
        }
    }
    result
}

/// Order-insensitive identity of a value: JSON with object keys sorted at every
/// depth, so `{"a":1,"b":2}` and `{"b":2,"a":1}` compare equal.
pub fn canonical_key(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let body: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), canonical_key(v)))
                .collect();
            format!("{{{}}}", body.join(","))
        }
        Value::Array(items) => {
            let body: Vec<String> = items.iter().map(canonical_key).collect();
            format!("[{}]", body.join(","))
        }
        other => other.to_string(),
    }
}

/// Concatenate `first` then `second`, dropping items deep-equal to one already
/// kept. The first occurrence wins, so relative order is preserved.
pub fn dedupe_concat(first: &[Value], second: &[Value]) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(first.len() + second.len());
    for item in first.iter().chain(second) {
        if seen.insert(canonical_key(item)) {
            result.push(item.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn obj(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            _ => panic!("test value must be an object"),
        }
    }

    #[test]
    fn test_deep_merge_overlay_wins_and_recurses() {
        let base = obj(json!({"a": 1, "nested": {"x": 1, "y": 2}}));
        let overlay = obj(json!({"nested": {"y": 20, "z": 30}, "b": 2}));

        let merged = deep_merge(&base, &overlay);

        assert_eq!(
            Value::Object(merged),
            json!({"a": 1, "nested": {"x": 1, "y": 20, "z": 30}, "b": 2})
        );
    }

    #[test]
    fn test_deep_merge_replaces_arrays_wholesale() {
        let base = obj(json!({"list": [1, 2, 3]}));
        let overlay = obj(json!({"list": [9]}));
        assert_eq!(Value::Object(deep_merge(&base, &overlay)), json!({"list": [9]}));
    }

    #[test]
    fn test_deep_merge_keeps_base_key_positions() {
        let base = obj(json!({"first": 1, "second": 2}));
        let overlay = obj(json!({"second": 3, "first": 4}));
        let merged = deep_merge(&base, &overlay);
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["first", "second"]);
    }

    #[test]
    fn test_fill_defaults_target_wins() {
        let target = obj(json!({"engines": {"node": "20"}, "name": "app"}));
        let defaults = obj(json!({"engines": {"node": "18", "npm": "10"}, "license": "MIT"}));

        let filled = fill_defaults(&target, &defaults);

        assert_eq!(
            Value::Object(filled),
            json!({"engines": {"node": "20", "npm": "10"}, "name": "app", "license": "MIT"})
        );
    }

    #[test]
    fn test_fill_defaults_does_not_descend_into_scalar_conflicts() {
        let target = obj(json!({"config": "custom"}));
        let defaults = obj(json!({"config": {"strict": true}}));
        assert_eq!(
            Value::Object(fill_defaults(&target, &defaults)),
            json!({"config": "custom"})
        );
    }

    #[test]
    fn test_canonical_key_ignores_object_key_order() {
        assert_eq!(
            canonical_key(&json!({"a": 1, "b": [{"y": 1, "x": 2}]})),
            canonical_key(&json!({"b": [{"x": 2, "y": 1}], "a": 1}))
        );
        assert_ne!(canonical_key(&json!([1, 2])), canonical_key(&json!([2, 1])));
    }

    #[test]
    fn test_dedupe_concat_first_occurrence_wins() {
        let first = vec![json!("a"), json!("b")];
        let second = vec![json!("b"), json!("c")];
        assert_eq!(
            dedupe_concat(&first, &second),
            vec![json!("a"), json!("b"), json!("c")]
        );
    }

    #[test]
    fn test_dedupe_concat_collapses_duplicates_within_one_side() {
        let first = vec![json!({"n": 1}), json!({"n": 1})];
        assert_eq!(dedupe_concat(&first, &[]), vec![json!({"n": 1})]);
    }
}
