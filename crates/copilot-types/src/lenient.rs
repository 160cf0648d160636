//! Tolerant readers for fields the extraction API types loosely.
//!
//! The API reports flags as `0`/`1`, `true`/`false` or `null`, some text
//! fields (salary, ids embedded in text) arrive as numbers, and ids may be
//! integral floats. Readers return `None` for shapes they cannot use.

use chrono::DateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::job::JobId;

/// Interpret a JSON value as a flag: `true`, any non-zero number and the
/// strings `"true"`/`"1"` are set; `null` is absent.
pub fn value_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        Value::String(s) => Some(matches!(s.trim(), "true" | "1")),
        Value::Array(_) | Value::Object(_) => Some(false),
    }
}

/// Strict flag: exactly `1` or `true`.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Text from a string, a number or a bool.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A job id from an integer, an integral float or text.
pub fn job_id(value: &Value) -> Option<JobId> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(JobId::Int(i)),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| JobId::Int(f as i64)),
        },
        Value::String(s) if !s.trim().is_empty() => Some(JobId::Text(s.clone())),
        _ => None,
    }
}

/// Unix seconds from a number, numeric text or an RFC 3339 timestamp.
pub fn timestamp(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<f64>()
                .ok()
                .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|t| t.timestamp() as f64))
        }
        _ => None,
    }
}

/// `Option<bool>` from a bool, a number or null.
pub fn opt_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_flag))
}

/// `Option<String>` from a string, a number, a bool or null.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text))
}

/// A [`JobId`] that must be present in some usable form.
pub fn required_job_id<'de, D>(deserializer: D) -> Result<JobId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    job_id(&value).ok_or_else(|| D::Error::custom(format!("unusable job_id: {value}")))
}
