//! Argument validation at the router boundary.
//!
//! Missing or malformed arguments are a caller error, reported as
//! [`OrderError::Validation`] and recovered into a structured
//! `{success: false, error}` response before the ledger is ever touched —
//! never a panic, never forwarded downstream.

use serde_json::Value;

use carhop_core::errors::OrderError;

/// Extract a required string parameter.
///
/// Missing, null, empty, or non-string values all fail with a message
/// naming the parameter.
pub fn require_string(args: &Value, param: &str, description: &str) -> Result<String, OrderError> {
    match args.get(param) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_) | Value::Null) | None => Err(OrderError::Validation(format!(
            "missing required parameter: {param} ({description})"
        ))),
        Some(_) => Err(OrderError::Validation(format!(
            "invalid type for parameter: {param} (expected string)"
        ))),
    }
}

/// Extract an optional string parameter. Null and missing are both `None`.
pub fn optional_string(args: &Value, param: &str) -> Option<String> {
    args.get(param).and_then(Value::as_str).map(String::from)
}

/// Extract a parameter that may be a bare string or a list of strings.
///
/// The driver sends `modifications` either way; a bare string is
/// normalized to a one-element list, null/missing to an empty list.
pub fn string_or_list(args: &Value, param: &str) -> Result<Vec<String>, OrderError> {
    match args.get(param) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| {
                entry.as_str().map(String::from).ok_or_else(|| {
                    OrderError::Validation(format!(
                        "invalid type for parameter: {param} (expected string or array of strings)"
                    ))
                })
            })
            .collect(),
        Some(_) => Err(OrderError::Validation(format!(
            "invalid type for parameter: {param} (expected string or array of strings)"
        ))),
    }
}
