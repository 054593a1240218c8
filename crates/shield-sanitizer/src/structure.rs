//! Structural Sanitizer
//!
//! Recursively rebuilds a JSON document with every string escaped and every
//! dangerous key removed. The input is never modified; the output is a fresh
//! allocation with the same shape.
//!
//! ## Prototype Pollution
//!
//! Downstream consumers written in prototype-based languages treat keys such
//! as `__proto__` specially: assigning through them mutates a shared
//! prototype. Those keys are dropped here, together with their values,
//! before the key itself is escaped.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::SanitizerConfig;
use crate::escape::escape_str;

/// Sanitize a JSON document.
///
/// - Strings are escaped (keys and values)
/// - Arrays keep their order and length
/// - Mappings keep insertion order; dangerous keys are dropped
/// - Numbers, booleans and null are copied
///
/// Containers nested deeper than `config.max_depth` are replaced by `null`.
pub fn sanitize_structure(value: &Value, config: &SanitizerConfig) -> Value {
    walk(value, config, 0)
}

fn walk(value: &Value, config: &SanitizerConfig, depth: usize) -> Value {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        Value::String(s) => Value::String(escape_str(s)),
        Value::Array(items) => {
            if depth >= config.max_depth {
                return truncated(depth);
            }
            Value::Array(
                items
                    .iter()
                    .map(|item| walk(item, config, depth + 1))
                    .collect(),
            )
        }
        Value::Object(map) => {
            if depth >= config.max_depth {
                return truncated(depth);
            }
            Value::Object(walk_map(map, config, depth))
        }
    }
}

fn walk_map(map: &Map<String, Value>, config: &SanitizerConfig, depth: usize) -> Map<String, Value> {
    let mut output = Map::with_capacity(map.len());

    for (key, child) in map {
        if config.dangerous_keys.contains(key) {
            debug!(key = %key, "Dropped dangerous key");
            continue;
        }

        let escaped = escape_str(key);
        // NUL stripping can turn "__pro\0to__" back into a dangerous key
        if config.dangerous_keys.contains(&escaped) {
            debug!(key = %escaped, "Dropped dangerous key after escaping");
            continue;
        }

        output.insert(escaped, walk(child, config, depth + 1));
    }

    output
}

fn truncated(depth: usize) -> Value {
    warn!(depth, "Structure exceeds maximum depth, subtree replaced with null");
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sanitize(value: &Value) -> Value {
        sanitize_structure(value, &SanitizerConfig::default())
    }

    #[test]
    fn test_scalars_delegate_to_escaper() {
        assert_eq!(sanitize(&json!("<b>")), json!("&lt;b&gt;"));
        assert_eq!(sanitize(&json!(7)), json!(7));
        assert_eq!(sanitize(&json!(false)), json!(false));
        assert_eq!(sanitize(&json!(null)), json!(null));
    }

    #[test]
    fn test_array_order_and_length_preserved() {
        let input = json!(["<a>", 1, null, ["x/y"]]);
        let output = sanitize(&input);
        assert_eq!(output, json!(["&lt;a&gt;", 1, null, ["x&#x2F;y"]]));
    }

    #[test]
    fn test_nested_shape_preserved() {
        let input = json!({
            "patient": {
                "name": "O'Brien",
                "beds": [1, 2, {"note": "<i>stable</i>"}],
                "active": true
            }
        });
        let output = sanitize(&input);
        assert_eq!(
            output,
            json!({
                "patient": {
                    "name": "O&#x27;Brien",
                    "beds": [1, 2, {"note": "&lt;i&gt;stable&lt;&#x2F;i&gt;"}],
                    "active": true
                }
            })
        );
    }

    #[test]
    fn test_dangerous_keys_dropped() {
        let input = json!({
            "__proto__": {"isAdmin": true},
            "constructor": {"prototype": {"polluted": 1}},
            "prototype": 1,
            "name": "ok"
        });
        let output = sanitize(&input);
        assert_eq!(output, json!({"name": "ok"}));
    }

    #[test]
    fn test_nested_dangerous_keys_dropped() {
        let input = json!({"a": [{"__proto__": {"x": 1}, "b": 2}]});
        assert_eq!(sanitize(&input), json!({"a": [{"b": 2}]}));
    }

    #[test]
    fn test_null_byte_disguised_key_dropped() {
        let input = json!({"__pro\u{0}to__": {"x": 1}});
        assert_eq!(sanitize(&input), json!({}));
    }

    #[test]
    fn test_keys_escaped() {
        let input = json!({"<k>": 1});
        assert_eq!(sanitize(&input), json!({"&lt;k&gt;": 1}));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let input: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let output = sanitize(&input);
        let keys: Vec<&String> = output.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_colliding_keys_last_write_wins() {
        let input: Value = serde_json::from_str(r#"{"a\u0000": 1, "b": 2, "a": 3}"#).unwrap();
        let output = sanitize(&input);
        let entries: Vec<(&String, &Value)> = output.as_object().unwrap().iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (&"a".to_string(), &json!(3)));
    }

    #[test]
    fn test_input_not_mutated() {
        let input = json!({"x": "<y>"});
        let before = input.clone();
        let _ = sanitize(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_depth_limit_truncates() {
        let config = SanitizerConfig::default().with_max_depth(2);
        let input = json!({"a": {"b": {"c": 1}}, "d": [1]});
        let output = sanitize_structure(&input, &config);
        assert_eq!(output, json!({"a": {"b": null}, "d": [1]}));
    }

    #[test]
    fn test_custom_dangerous_key() {
        let config = SanitizerConfig::default().with_dangerous_key("password");
        let input = json!({"user": "ann", "password": "hunter2"});
        assert_eq!(sanitize_structure(&input, &config), json!({"user": "ann"}));
    }
}
