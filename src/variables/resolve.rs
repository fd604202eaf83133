//! Default value resolution.
//!
//! Every variable gets exactly one default string. The first source present
//! wins:
//!
//! 1. the variable's explicit `default`
//! 2. the template's `sample_data[name]`
//! 3. the variable's `example`
//! 4. `""`
//!
//! A key that is present with a `null` value counts as present and
//! resolves to `""`.
//!
//! Values are canonicalised with [`to_value_string`] so that later
//! "is this still the default" checks are plain string equality.

use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::template::VariableSpec;

/// Canonical string form of a JSON value.
///
/// Strings are kept verbatim and `null` becomes `""`. Integral numbers print
/// without a fractional part (`5.0` becomes `"5"`). Arrays and objects are
/// encoded as compact JSON; object keys come out sorted, so equal values
/// always encode identically.
pub fn to_value_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(n),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn number_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Compute the default value of every named variable.
///
/// Variables without a name are skipped. A missing `sample_data` behaves
/// like an empty one.
pub fn resolve_defaults(
    variables: &[VariableSpec],
    sample_data: Option<&Map<String, Value>>,
) -> HashMap<String, String> {
    variables
        .iter()
        .filter(|v| !v.name.is_empty())
        .map(|v| (v.name.clone(), default_for(v, sample_data)))
        .collect()
}

/// Default value for a single variable.
pub fn default_for(variable: &VariableSpec, sample_data: Option<&Map<String, Value>>) -> String {
    let sample = sample_data.and_then(|data| data.get(&variable.name));

    variable
        .default
        .as_ref()
        .or(sample)
        .or(variable.example.as_ref())
        .map(to_value_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn var(value: Value) -> VariableSpec {
        serde_json::from_value(value).unwrap()
    }

    fn sample(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("sample data must be an object"),
        }
    }

    #[test]
    fn test_canonical_strings() {
        assert_eq!(to_value_string(&json!(null)), "");
        assert_eq!(to_value_string(&json!("a b")), "a b");
        assert_eq!(to_value_string(&json!(true)), "true");
        assert_eq!(to_value_string(&json!(42)), "42");
        assert_eq!(to_value_string(&json!(5.0)), "5");
        assert_eq!(to_value_string(&json!(2.75)), "2.75");
        assert_eq!(to_value_string(&json!([1, "x"])), r#"[1,"x"]"#);
    }

    #[test]
    fn test_object_encoding_is_stable() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a": 2, "b": 1}"#).unwrap();
        assert_eq!(to_value_string(&a), to_value_string(&b));
        assert_eq!(to_value_string(&a), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn test_missing_everything_yields_empty() {
        let defaults = resolve_defaults(&[var(json!({"name": "qty"}))], None);
        assert_eq!(defaults["qty"], "");
    }

    #[test]
    fn test_precedence_chain() {
        let data = sample(json!({"a": "sample-a", "b": "sample-b", "c": null}));
        let vars = vec![
            var(json!({"name": "a", "default": "default-a", "example": "ex-a"})),
            var(json!({"name": "b", "example": "ex-b"})),
            var(json!({"name": "c", "example": 7})),
            var(json!({"name": "d"})),
        ];
        let defaults = resolve_defaults(&vars, Some(&data));
        assert_eq!(defaults["a"], "default-a");
        assert_eq!(defaults["b"], "sample-b");
        assert_eq!(defaults["c"], "");
        assert_eq!(defaults["d"], "");
    }

    #[test]
    fn test_null_default_stops_precedence() {
        let data = sample(json!({"a": "S", "b": "S"}));
        let vars = vec![
            var(json!({"name": "a", "default": null})),
            var(json!({"name": "b", "example": null})),
        ];
        let defaults = resolve_defaults(&vars, Some(&data));
        assert_eq!(defaults["a"], "");
        assert_eq!(defaults["b"], "S");
    }

    #[test]
    fn test_structured_default_is_json() {
        let vars = vec![var(json!({"name": "lines", "default": {"y": [1, 2], "x": "a"}}))];
        let defaults = resolve_defaults(&vars, None);
        assert_eq!(defaults["lines"], r#"{"x":"a","y":[1,2]}"#);
    }

    #[test]
    fn test_unnamed_variables_skipped() {
        let defaults = resolve_defaults(&[var(json!({"label": "Ghost", "default": "x"}))], None);
        assert!(defaults.is_empty());
    }

    #[test]
    fn test_repeatable() {
        let vars = vec![var(json!({"name": "a", "default": [3, 1]}))];
        assert_eq!(resolve_defaults(&vars, None), resolve_defaults(&vars, None));
    }
}
