//! Lenient field decoding for dashboard payloads.
//!
//! The backend serializes numbers inconsistently (numbers, numeric strings,
//! `null`, or the field is missing altogether). These helpers collapse all of
//! that into `Option` values at the serde boundary so nothing downstream has
//! to care which shape arrived.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as a finite number.
///
/// Numbers and numeric strings are accepted. Everything else, including
/// strings such as `"NaN"` or `"inf"`, yields `None`.
pub fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Optional finite number.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Finite number, missing or malformed values become `0.0`.
pub fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.unwrap_or(0.0))
}

/// Non-negative integer count. Fractions are truncated, negatives dropped.
pub fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc() as u64))
}

/// Optional text. Numbers are rendered to their JSON text, empty strings
/// count as missing.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Truthiness flag: `true`, non-zero numbers, `"1"`/`"true"` are set.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true")
        }
        _ => false,
    })
}

/// List of records where `null` (for the list or any element) is tolerated.
///
/// A `null` element decodes as `T::default()` so list positions are kept.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "number")]
        n: Option<f64>,
        #[serde(default, deserialize_with = "count")]
        c: Option<u64>,
        #[serde(default, deserialize_with = "text")]
        t: Option<String>,
        #[serde(default, deserialize_with = "flag")]
        f: bool,
    }

    fn probe(v: Value) -> Probe {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        assert_eq!(probe(json!({"n": "12.5"})).n, Some(12.5));
        assert_eq!(probe(json!({"n": 3})).n, Some(3.0));
    }

    #[test]
    fn numbers_reject_garbage() {
        assert_eq!(probe(json!({"n": "abc"})).n, None);
        assert_eq!(probe(json!({"n": "NaN"})).n, None);
        assert_eq!(probe(json!({"n": null})).n, None);
        assert_eq!(probe(json!({"n": [1]})).n, None);
        assert_eq!(probe(json!({})).n, None);
    }

    #[test]
    fn counts_truncate_and_drop_negatives() {
        assert_eq!(probe(json!({"c": 7.9})).c, Some(7));
        assert_eq!(probe(json!({"c": -1})).c, None);
    }

    #[test]
    fn text_accepts_numbers_and_skips_empty() {
        assert_eq!(probe(json!({"t": 42})).t.as_deref(), Some("42"));
        assert_eq!(probe(json!({"t": ""})).t, None);
    }

    #[test]
    fn flags_follow_truthiness() {
        assert!(probe(json!({"f": 1})).f);
        assert!(probe(json!({"f": true})).f);
        assert!(probe(json!({"f": "true"})).f);
        assert!(!probe(json!({"f": 0})).f);
        assert!(!probe(json!({})).f);
    }
}
