//! Query-Filter Sanitizer
//!
//! Removes operator keys that are not on the allow-list from a query
//! document before it reaches the persistence layer. Operators such as
//! `$where` (server-side code evaluation) or `$expr` would otherwise let a
//! client rewrite the query's meaning.
//!
//! Every removal is logged at `warn` level and returned in
//! [`QueryOutcome::dropped`].

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::warn;

use crate::config::SanitizerConfig;
use crate::models::{DroppedOperator, QueryOutcome};

/// Filter a query document.
///
/// Non-mapping input is returned unchanged. Inside a mapping, operator-shaped
/// keys missing from the allow-list are dropped together with their value;
/// field names always survive. Mapping values are filtered recursively, and
/// so are mappings found inside sequences (the operands of `$and`, `$or`).
pub fn filter_query(query: &Value, config: &SanitizerConfig) -> QueryOutcome {
    let mut dropped = Vec::new();

    let sanitized = match query {
        Value::Object(map) => Value::Object(filter_map(map, config, "", 0, &mut dropped)),
        other => other.clone(),
    };

    QueryOutcome { sanitized, dropped }
}

fn filter_map(
    map: &Map<String, Value>,
    config: &SanitizerConfig,
    path: &str,
    depth: usize,
    dropped: &mut Vec<DroppedOperator>,
) -> Map<String, Value> {
    let mut output = Map::with_capacity(map.len());

    for (key, child) in map {
        let child_path = join(path, key);

        // escaping strips NUL later, so "\0$where" must be judged as "$where"
        let shape = operator_shape(key);
        if config.is_operator(&shape) && !config.allowed_operators.contains(&*shape) {
            warn!(operator = %shape, path = %child_path, "Blocked disallowed query operator");
            dropped.push(DroppedOperator {
                path: child_path,
                operator: shape.into_owned(),
            });
            continue;
        }

        let value = filter_value(child, config, &child_path, depth + 1, dropped);
        output.insert(key.clone(), value);
    }

    output
}

fn filter_value(
    value: &Value,
    config: &SanitizerConfig,
    path: &str,
    depth: usize,
    dropped: &mut Vec<DroppedOperator>,
) -> Value {
    match value {
        Value::Object(map) => {
            if depth >= config.max_depth {
                warn!(path = %path, depth, "Query exceeds maximum depth, subtree replaced with null");
                return Value::Null;
            }
            Value::Object(filter_map(map, config, path, depth, dropped))
        }
        Value::Array(items) => {
            if depth >= config.max_depth {
                warn!(path = %path, depth, "Query exceeds maximum depth, subtree replaced with null");
                return Value::Null;
            }
            Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let item_path = join(path, &index.to_string());
                        filter_value(item, config, &item_path, depth + 1, dropped)
                    })
                    .collect(),
            )
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
    }
}

fn operator_shape(key: &str) -> Cow<'_, str> {
    if key.contains('\0') {
        Cow::Owned(key.replace('\0', ""))
    } else {
        Cow::Borrowed(key)
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}
