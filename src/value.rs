//! JSON value coercion
//!
//! Backends disagree on how they spell booleans and numbers ("True",
//! `1`, `"1024"`, `null`). These helpers fold them into the handful of
//! shapes the normalizers and filters compare against.

use serde_json::Value;

/// Truthiness of a raw value: null, false, zero and empty containers are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Lenient boolean: a string is true only if it case-folds to "true"
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        other => is_truthy(other),
    }
}

/// Integer view of a value
///
/// Falsy values are `Some(0)`. Strings are trimmed and parsed, floats are
/// truncated toward zero. Returns `None` when the value has no integer
/// reading (`"aaa"`, `[1]`, `"1.5"`).
pub fn as_int(value: &Value) -> Option<i64> {
    if !is_truthy(value) {
        return Some(0);
    }
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Float to integer toward zero, refusing values outside the `i64` range
fn truncate(f: f64) -> Option<i64> {
    let f = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Float view of a value, with the same falsy-is-zero rule as [`as_int`]
pub fn as_float(value: &Value) -> Option<f64> {
    if !is_truthy(value) {
        return Some(0.0);
    }
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Text form used in messages and identifier comparison
///
/// Strings are returned bare, everything else as compact JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// Identifier text: strings bare, numbers in JSON form, nothing for the rest
pub fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
