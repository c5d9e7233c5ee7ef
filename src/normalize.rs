//! # Normalize — JSON Responses to Fixed-Schema Rows
//!
//! Converts one heterogeneous JSON response (an object or an array of
//! objects) into a `Table` restricted to exactly the declared columns.
//! Nested objects are flattened with `_`-joined names, so
//! `{"chess_daily": {"best": {"rating": 1200}}}` becomes the column
//! `chess_daily_best_rating`. Declared columns absent from the flattened
//! input are filled with `Field::Null` — never omitted and never an error.
//!
//! Shape handling:
//! - object → one row
//! - array → one row per object element
//! - null / empty array → zero rows
//!
//! `extra_fields` (capture timestamp, the identifier the request was keyed
//! by) are merged into every produced row and win over same-named input
//! fields.

use std::collections::HashMap;

use serde_json::Value;

use crate::table::{Field, Table};

/// Convert a scalar JSON value into a cell. Integral numbers become `Int`;
/// non-integral numbers, strings and booleans become `Str`; arrays are kept
/// as their JSON text (the normalizer does not explode nested lists).
pub fn field_from_json(value: &Value) -> Field {
    match value {
        Value::Null => Field::Null,
        Value::Number(n) => match n.as_i64() {
            Some(v) => Field::Int(v),
            None => Field::Str(n.to_string()),
        },
        Value::String(s) => Field::Str(s.clone()),
        Value::Bool(b) => Field::Str(b.to_string()),
        other => Field::Str(other.to_string()),
    }
}

/// Flatten one JSON object into `_`-joined (name, cell) pairs.
pub fn flatten(value: &Value) -> HashMap<String, Field> {
    let mut out = HashMap::new();
    flatten_into("", value, &mut out);
    out
}

fn flatten_into(prefix: &str, value: &Value, out: &mut HashMap<String, Field>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}_{}", prefix, key)
                };
                flatten_into(&name, v, out);
            }
        }
        other => {
            if !prefix.is_empty() {
                out.insert(prefix.to_string(), field_from_json(other));
            }
        }
    }
}

/// Normalize a raw response into a table with exactly `columns`.
pub fn normalize(raw: &Value, extra_fields: &[(&str, Field)], columns: &[&str]) -> Table {
    let mut table = Table::empty(columns);
    let items: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };

    for item in items {
        if !item.is_object() {
            continue;
        }
        let mut flat = flatten(item);
        for (name, value) in extra_fields {
            flat.insert(name.to_string(), value.clone());
        }
        let row = columns
            .iter()
            .map(|c| flat.remove(*c).unwrap_or(Field::Null))
            .collect();
        table.push_row(row);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_with_missing_column_fills_null() {
        // {"a": 1} against declared [a, b, ts] with extra ts=100
        let t = normalize(
            &json!({"a": 1}),
            &[("ts", Field::Int(100))],
            &["a", "b", "ts"],
        );
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(0, "a"), Some(&Field::Int(1)));
        assert_eq!(t.get(0, "b"), Some(&Field::Null));
        assert_eq!(t.get(0, "ts"), Some(&Field::Int(100)));
    }

    #[test]
    fn nested_objects_flatten_with_underscores() {
        let raw = json!({"chess_daily": {"best": {"rating": 1200}, "last": {"rating": 1100}}});
        let t = normalize(&raw, &[], &["chess_daily_best_rating", "chess_daily_last_rating"]);
        assert_eq!(t.get(0, "chess_daily_best_rating"), Some(&Field::Int(1200)));
        assert_eq!(t.get(0, "chess_daily_last_rating"), Some(&Field::Int(1100)));
    }

    #[test]
    fn array_yields_one_row_per_object() {
        let raw = json!([{"a": 1}, {"a": 2}, {"a": 3}]);
        let t = normalize(&raw, &[], &["a"]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(2, "a"), Some(&Field::Int(3)));
    }

    #[test]
    fn empty_array_and_null_yield_zero_rows() {
        assert!(normalize(&json!([]), &[], &["a"]).is_empty());
        assert!(normalize(&Value::Null, &[], &["a"]).is_empty());
    }

    #[test]
    fn undeclared_input_fields_are_dropped() {
        let t = normalize(&json!({"a": 1, "junk": "x"}), &[], &["a"]);
        assert_eq!(t.columns(), &["a".to_string()]);
        assert_eq!(t.get(0, "junk"), None);
    }

    #[test]
    fn extra_fields_win_over_input() {
        let t = normalize(
            &json!({"username": "from_response"}),
            &[("username", Field::Str("from_request".into()))],
            &["username"],
        );
        assert_eq!(t.get(0, "username"), Some(&Field::Str("from_request".into())));
    }

    #[test]
    fn scalar_conversion_rules() {
        let raw = json!({"i": 7, "f": 2.5, "s": "x", "b": true, "n": null, "l": [1, 2]});
        let t = normalize(&raw, &[], &["i", "f", "s", "b", "n", "l"]);
        assert_eq!(t.get(0, "i"), Some(&Field::Int(7)));
        assert_eq!(t.get(0, "f"), Some(&Field::Str("2.5".into())));
        assert_eq!(t.get(0, "s"), Some(&Field::Str("x".into())));
        assert_eq!(t.get(0, "b"), Some(&Field::Str("true".into())));
        assert_eq!(t.get(0, "n"), Some(&Field::Null));
        assert_eq!(t.get(0, "l"), Some(&Field::Str("[1,2]".into())));
    }

    #[test]
    fn normalizing_a_normalized_row_is_a_noop() {
        let raw = json!({"a": 1, "b": "two"});
        let first = normalize(&raw, &[], &["a", "b", "c"]);

        // Rebuild a JSON object from the produced row and run it through again.
        let mut obj = serde_json::Map::new();
        for col in first.columns() {
            let v = match first.get(0, col) {
                Some(Field::Int(v)) => json!(v),
                Some(Field::Str(s)) => json!(s),
                _ => Value::Null,
            };
            obj.insert(col.clone(), v);
        }
        let second = normalize(&Value::Object(obj), &[], &["a", "b", "c"]);
        assert_eq!(first, second);
    }
}
