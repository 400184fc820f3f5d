//! Wire shapes for the HTTP API and the field rules applied to them.

pub mod health;
pub mod image;
pub mod text;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use service_core::error::AppError;
use validator::ValidationErrors;

pub use health::HealthResponse;
pub use image::{GenerateImageRequest, GenerateImageResponse};
pub use text::{GenerateTextRequest, GenerateTextResponse};

/// Deserialize an optional string field, trimming whitespace and mapping `null` to "".
pub(crate) fn trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|s| s.trim().to_string())
        .unwrap_or_default())
}

/// Deserialize any JSON value into a string. Non-strings (including `null`)
/// become their JSON text, so the field validator rejects them by name.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Deserialize any JSON value as an integer; non-integers map to 0, which no
/// range accepted by the API contains.
pub(crate) fn lenient_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_i64().unwrap_or(0))
}

/// Turn validator output into the first failing field, in the order fields are checked.
pub(crate) fn first_failure(errors: &ValidationErrors, field_order: &[&str]) -> AppError {
    let field_errors = errors.field_errors();

    field_order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .filter_map(|errs| errs.first())
        .next()
        .map(|err| {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            AppError::bad_request(err.code.to_string(), message)
        })
        .unwrap_or_else(|| AppError::bad_request("Invalid request", errors.to_string()))
}
