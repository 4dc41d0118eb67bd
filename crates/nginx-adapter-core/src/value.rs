//! Typed access to component settings and trait properties.
//!
//! Settings arrive as free-form JSON values. Reading them goes through these
//! helpers so that a shape mismatch becomes an error rather than a panic.

use serde_json::Value;
use thiserror::Error;

/// Free-form settings or properties attached to an OAM document.
pub type Settings = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("missing required key: {0}")]
    Missing(String),

    #[error("invalid value for {key}: expected {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Name of the JSON type held by a value.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Read a required string entry.
pub fn settings_str<'a>(settings: &'a Settings, key: &str) -> Result<&'a str, ValueError> {
    let value = settings
        .get(key)
        .ok_or_else(|| ValueError::Missing(key.to_string()))?;

    value.as_str().ok_or_else(|| ValueError::WrongType {
        key: key.to_string(),
        expected: "string",
        found: kind_of(value),
    })
}

/// Read a required sequence entry, keeping only its string elements.
pub fn property_string_list(properties: &Settings, key: &str) -> Result<Vec<String>, ValueError> {
    let value = properties
        .get(key)
        .ok_or_else(|| ValueError::Missing(key.to_string()))?;

    let items = value.as_array().ok_or_else(|| ValueError::WrongType {
        key: key.to_string(),
        expected: "sequence",
        found: kind_of(value),
    })?;

    Ok(items
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(value: Value) -> Settings {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_settings_str() {
        let s = settings(json!({"version": "1.2.0", "replicas": 3}));
        assert_eq!(settings_str(&s, "version").unwrap(), "1.2.0");
        assert_eq!(
            settings_str(&s, "replicas").unwrap_err(),
            ValueError::WrongType {
                key: "replicas".to_string(),
                expected: "string",
                found: "number",
            }
        );
        assert_eq!(
            settings_str(&s, "chart").unwrap_err(),
            ValueError::Missing("chart".to_string())
        );
    }

    #[test]
    fn test_string_list_drops_non_strings() {
        let p = settings(json!({"namespaces": ["ns1", 7, null, "ns2", {"a": 1}]}));
        assert_eq!(
            property_string_list(&p, "namespaces").unwrap(),
            vec!["ns1", "ns2"]
        );
    }

    #[test]
    fn test_string_list_rejects_scalar() {
        let p = settings(json!({"namespaces": "ns1"}));
        let err = property_string_list(&p, "namespaces").unwrap_err();
        assert!(matches!(err, ValueError::WrongType { found: "string", .. }));
    }
}
