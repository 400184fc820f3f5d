//! Request validation for the generation endpoints.
//!
//! Turns a raw request body into a typed request or a 400 naming the first
//! offending field. Nothing here talks to the upstream API.

use crate::dtos::{first_failure, GenerateImageRequest, GenerateTextRequest};
use crate::models::{ImageAttachment, ImageReference, ImageRequest, TextModel, TextRequest};
use crate::services::storage::{sanitize_key, Storage};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::de::DeserializeOwned;
use serde_json::Value;
use service_core::error::AppError;
use std::path::Path;
use validator::Validate;

const DEFAULT_IMAGE_MIME: &str = "image/png";

fn invalid_json() -> AppError {
    AppError::bad_request("Invalid JSON", "Request must contain valid JSON data")
}

/// Parse the body as a non-empty JSON object and deserialize it into `T`.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| invalid_json())?;

    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(invalid_json()),
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(error = %e, "Request body has wrongly typed fields");
        invalid_json()
    })
}

pub fn validate_image_request(body: &[u8]) -> Result<ImageRequest, AppError> {
    let payload: GenerateImageRequest = parse_body(body)?;
    payload
        .validate()
        .map_err(|e| first_failure(&e, GenerateImageRequest::FIELD_ORDER))?;

    Ok(ImageRequest {
        prompt: payload.prompt,
        size: payload
            .size
            .parse()
            .map_err(|_| AppError::bad_request("Invalid size", "Unsupported size"))?,
        model: payload.model,
    })
}

pub async fn validate_text_request(
    body: &[u8],
    storage: &dyn Storage,
) -> Result<TextRequest, AppError> {
    let payload: GenerateTextRequest = parse_body(body)?;
    payload
        .validate()
        .map_err(|e| first_failure(&e, GenerateTextRequest::FIELD_ORDER))?;

    let mut model: TextModel = payload
        .model
        .parse()
        .map_err(|_| AppError::bad_request("Invalid model", "Unsupported model"))?;

    let image = match payload.image_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            model = model.with_vision();
            Some(ImageAttachment {
                original: url.to_string(),
                reference: resolve_image_reference(url, storage).await?,
            })
        }
        _ => None,
    };

    Ok(TextRequest {
        prompt: payload.prompt,
        max_tokens: u32::try_from(payload.max_tokens).map_err(|_| {
            AppError::bad_request(
                "Invalid max_tokens",
                "max_tokens must be an integer between 1 and 4000",
            )
        })?,
        model,
        image,
    })
}

fn is_remote(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Remote URLs pass through; anything else names a file in the generated-assets
/// directory and is inlined as a data URL.
async fn resolve_image_reference(
    url: &str,
    storage: &dyn Storage,
) -> Result<ImageReference, AppError> {
    if is_remote(url) {
        return Ok(ImageReference::Remote(url.to_string()));
    }

    let file_not_found = || {
        AppError::bad_request(
            "File not found",
            format!("Image file '{}' does not exist", url),
        )
    };

    let key = sanitize_key(url).ok_or_else(file_not_found)?;
    if !storage.exists(&key).await? {
        return Err(file_not_found());
    }

    let bytes = storage.download(&key).await?;
    let mime = mime_guess::from_path(Path::new(&key))
        .first_raw()
        .unwrap_or(DEFAULT_IMAGE_MIME);

    tracing::debug!(file = %key, mime, bytes = bytes.len(), "Inlining local image");

    Ok(ImageReference::Inline(format!(
        "data:{};base64,{}",
        mime,
        STANDARD.encode(bytes)
    )))
}
