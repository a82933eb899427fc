//! Argument validation helpers.
//!
//! Typed extraction from the assistant's argument object. Failures come
//! back as [`ToolError::Domain`] with a localized message, so the assistant
//! can correct itself and call again instead of the whole turn failing.

use serde_json::Value;

use crate::errors::ToolError;

/// Extract a required non-empty string argument.
pub fn required_str(args: &Value, param: &str) -> Result<String, ToolError> {
    match args.get(param) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_) | Value::Null) | None => Err(ToolError::domain(format!(
            "Parâmetro obrigatório ausente: {param}."
        ))),
        Some(_) => Err(ToolError::domain(format!(
            "Parâmetro inválido: {param} (esperava texto)."
        ))),
    }
}

/// Extract an optional string argument.
pub fn optional_str(args: &Value, param: &str) -> Option<String> {
    args.get(param).and_then(Value::as_str).map(String::from)
}

/// Extract a required positive integer argument.
pub fn required_u32(args: &Value, param: &str) -> Result<u32, ToolError> {
    match args.get(param).and_then(Value::as_u64) {
        Some(n) if n > 0 && u32::try_from(n).is_ok() => Ok(n as u32),
        _ => Err(ToolError::domain(format!(
            "Parâmetro inválido: {param} (esperava número inteiro positivo)."
        ))),
    }
}

/// Extract a required non-empty array argument.
pub fn required_array<'a>(args: &'a Value, param: &str) -> Result<&'a Vec<Value>, ToolError> {
    match args.get(param) {
        Some(Value::Array(items)) if !items.is_empty() => Ok(items),
        _ => Err(ToolError::domain(format!(
            "Parâmetro obrigatório ausente: {param} (esperava lista não vazia)."
        ))),
    }
}
